use std::fmt;

/// A node (or one endpoint of a multi-channel node) known to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZWaveEndpoint {
    pub node_id: u8,
    pub label: String,
}

impl ZWaveEndpoint {
    pub fn new(node_id: u8, label: impl Into<String>) -> Self {
        Self {
            node_id,
            label: label.into(),
        }
    }
}

impl fmt::Display for ZWaveEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (node {})", self.label, self.node_id)
    }
}

/// Node information frame reported during inclusion and exclusion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub node_id: u8,
    pub basic_device_class: u8,
    pub generic_device_class: u8,
    pub specific_device_class: u8,
    pub command_classes: Vec<u8>,
}

impl fmt::Display for NodeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "node {} [basic=0x{:02x}, generic=0x{:02x}, specific=0x{:02x}, command classes=",
            self.node_id,
            self.basic_device_class,
            self.generic_device_class,
            self.specific_device_class
        )?;
        for (i, cc) in self.command_classes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "0x{:02x}", cc)?;
        }
        f.write_str("]")
    }
}
