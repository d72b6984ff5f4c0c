//! The placed design consumed and annotated by the router.
//!
//! A [`Design`] holds primitive instances bound to device sites and the nets
//! connecting their pins. Routing appends [`Pip`]s to each [`Net`].

use crate::ids::{InstanceId, NetId};
use aion_device::{TileId, WireId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A placed netlist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Design {
    /// Design name.
    pub name: String,
    /// Target part name.
    pub part: String,
    /// All primitive instances.
    pub instances: Vec<Instance>,
    /// All nets, in routing-independent declaration order.
    pub nets: Vec<Net>,
    /// Auxiliary index: instance name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub instance_by_name: HashMap<String, InstanceId>,
    /// Auxiliary index: net name to ID (rebuilt on deserialization).
    #[serde(skip)]
    pub net_by_name: HashMap<String, NetId>,
}

impl Design {
    /// Creates an empty design for a part.
    pub fn new(name: impl Into<String>, part: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            part: part.into(),
            instances: Vec::new(),
            nets: Vec::new(),
            instance_by_name: HashMap::new(),
            net_by_name: HashMap::new(),
        }
    }

    /// Adds an instance and returns its ID.
    pub fn add_instance(&mut self, mut instance: Instance) -> InstanceId {
        let id = InstanceId::from_raw(self.instances.len() as u32);
        instance.id = id;
        self.instance_by_name.insert(instance.name.clone(), id);
        self.instances.push(instance);
        id
    }

    /// Adds a net and returns its ID.
    pub fn add_net(&mut self, mut net: Net) -> NetId {
        let id = NetId::from_raw(self.nets.len() as u32);
        net.id = id;
        self.net_by_name.insert(net.name.clone(), id);
        self.nets.push(net);
        id
    }

    /// Returns the instance with the given ID.
    pub fn instance(&self, id: InstanceId) -> &Instance {
        &self.instances[id.as_raw() as usize]
    }

    /// Returns the net with the given ID.
    pub fn net(&self, id: NetId) -> &Net {
        &self.nets[id.as_raw() as usize]
    }

    /// Returns a mutable reference to the net with the given ID.
    pub fn net_mut(&mut self, id: NetId) -> &mut Net {
        &mut self.nets[id.as_raw() as usize]
    }

    /// Looks up an instance by name.
    pub fn find_instance(&self, name: &str) -> Option<&Instance> {
        self.instance_by_name.get(name).map(|&id| self.instance(id))
    }

    /// Looks up a net by name.
    pub fn find_net(&self, name: &str) -> Option<&Net> {
        self.net_by_name.get(name).map(|&id| self.net(id))
    }

    /// Returns the number of nets.
    pub fn net_count(&self) -> usize {
        self.nets.len()
    }

    /// Returns the total number of PIPs over all nets.
    pub fn pip_count(&self) -> usize {
        self.nets.iter().map(|n| n.pips.len()).sum()
    }

    /// Rebuilds auxiliary indices after deserialization.
    pub fn rebuild_indices(&mut self) {
        self.instance_by_name.clear();
        for (i, inst) in self.instances.iter().enumerate() {
            self.instance_by_name
                .insert(inst.name.clone(), InstanceId::from_raw(i as u32));
        }
        self.net_by_name.clear();
        for (i, net) in self.nets.iter().enumerate() {
            self.net_by_name
                .insert(net.name.clone(), NetId::from_raw(i as u32));
        }
    }
}

/// A primitive instance, optionally bound to a device site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    /// Assigned by [`Design::add_instance`].
    pub id: InstanceId,
    /// Instance name.
    pub name: String,
    /// Primitive kind, e.g. `SLICEL` or `BUFGCTRL`.
    pub kind: String,
    /// Name of the device site the instance is placed on.
    pub site: Option<String>,
}

impl Instance {
    /// Creates an unplaced instance.
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            id: InstanceId::from_raw(0),
            name: name.into(),
            kind: kind.into(),
            site: None,
        }
    }

    /// Places the instance on a site.
    pub fn placed_at(mut self, site: impl Into<String>) -> Self {
        self.site = Some(site.into());
        self
    }
}

/// Electrical class of a net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum NetType {
    /// An ordinary signal net.
    #[default]
    Wire,
    /// Tied to power.
    Vcc,
    /// Tied to ground.
    Gnd,
}

impl NetType {
    /// Returns `true` for power and ground.
    pub fn is_static(self) -> bool {
        matches!(self, NetType::Vcc | NetType::Gnd)
    }
}

/// Role of a pin on its net.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinRole {
    /// Drives the net.
    Source,
    /// Is driven by the net.
    Sink,
}

/// A net pin: an instance pin by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pin {
    /// The instance owning the pin.
    pub instance: InstanceId,
    /// Pin name on the instance's site.
    pub name: String,
    /// Source or sink.
    pub role: PinRole,
}

/// A used programmable interconnect point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pip {
    /// Tile containing the PIP.
    pub tile: TileId,
    /// Wire the PIP is driven from.
    pub start: WireId,
    /// Wire the PIP drives.
    pub end: WireId,
}

/// A net with its pins and accumulated routing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Net {
    /// Assigned by [`Design::add_net`].
    pub id: NetId,
    /// Net name.
    pub name: String,
    /// Electrical class.
    pub net_type: NetType,
    /// Pins in declaration order.
    pub pins: Vec<Pin>,
    /// Committed PIPs in commit order.
    pub pips: Vec<Pip>,
}

impl Net {
    /// Creates a net with no pins.
    pub fn new(name: impl Into<String>, net_type: NetType) -> Self {
        Self {
            id: NetId::from_raw(0),
            name: name.into(),
            net_type,
            pins: Vec::new(),
            pips: Vec::new(),
        }
    }

    /// Appends a source pin.
    pub fn with_source(mut self, instance: InstanceId, pin: impl Into<String>) -> Self {
        self.pins.push(Pin {
            instance,
            name: pin.into(),
            role: PinRole::Source,
        });
        self
    }

    /// Appends a sink pin.
    pub fn with_sink(mut self, instance: InstanceId, pin: impl Into<String>) -> Self {
        self.pins.push(Pin {
            instance,
            name: pin.into(),
            role: PinRole::Sink,
        });
        self
    }

    /// Returns the first source pin.
    pub fn source(&self) -> Option<&Pin> {
        self.pins.iter().find(|p| p.role == PinRole::Source)
    }

    /// Iterates sink pins in pin-list order.
    pub fn sinks(&self) -> impl Iterator<Item = &Pin> {
        self.pins.iter().filter(|p| p.role == PinRole::Sink)
    }

    /// Returns `true` if the net already carries PIPs.
    pub fn is_prerouted(&self) -> bool {
        !self.pips.is_empty()
    }
}
