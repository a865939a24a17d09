use slotmap::new_key_type;

new_key_type! {
    /// Identifies a port in a [`crate::port::PortBank`].
    pub struct PortId;

    /// Identifies a placed entity in a [`crate::grid::Grid`].
    pub struct EntityId;
}
