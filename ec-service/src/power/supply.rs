//! Generic power supply reporting types

/// Charging status reported to consumers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Status {
    /// Status cannot be determined
    #[default]
    Unknown,
    /// Power is available but the battery is not charging
    NotCharging,
    /// Battery is charging
    Charging,
    /// Battery is full
    Full,
}

/// What a power supply powers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Scope {
    /// Scope is unknown
    Unknown,
    /// Supply powers the whole system
    System,
    /// Supply powers a single device, e.g. a peripheral
    Device,
}

/// Kind of power supply
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SupplyType {
    /// Battery
    Battery,
    /// Mains/AC adapter
    Mains,
}

/// Properties a power supply can expose
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Property {
    /// Charging status
    Status,
    /// Battery capacity in percent
    Capacity,
    /// Supply scope
    Scope,
}

/// Value of a power supply property
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PropertyValue {
    /// Charging status
    Status(Status),
    /// Battery capacity in percent, `None` until the first successful read
    Capacity(Option<u8>),
    /// Supply scope
    Scope(Scope),
}

/// Power supply description handed to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Descriptor<'a> {
    /// Supply name, unique within the system
    pub name: &'a str,
    /// Supply type
    pub kind: SupplyType,
    /// Properties the supply exposes
    pub properties: &'a [Property],
}

impl Descriptor<'_> {
    /// Returns true if the supply exposes `property`
    pub fn has_property(&self, property: Property) -> bool {
        self.properties.contains(&property)
    }
}
