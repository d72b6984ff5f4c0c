//! PIP routing for placed FPGA designs.
//!
//! This crate takes a placed [`Design`] (instances bound to device sites) and
//! a device connectivity model ([`aion_device::DeviceModel`]) and finds, for
//! every net, a chain of programmable interconnect points from the source pin
//! to each sink pin. Results are appended to [`Net::pips`].
//!
//! # Pipeline
//!
//! 1. **Prepare**: claim the PIPs of pre-routed nets and reserve pin wires
//! 2. **Order**: ground nets, then power nets, then signal nets
//! 3. **Route**: per net, per sink maze search, growing the net's tree
//! 4. **Report**: unrouted sinks go to the [`DiagnosticSink`] and the
//!    returned [`RouteReport`]
//!
//! # Usage
//!
//! ```ignore
//! use aion_route::route_design;
//!
//! let report = route_design(&mut design, &device, &config.router, &sink)?;
//! println!("{report}");
//! ```

#![warn(missing_docs)]

pub mod design;
pub mod ids;
pub mod report;
mod routing;

pub use design::{Design, Instance, Net, NetType, Pin, PinRole, Pip};
pub use ids::{InstanceId, NetId};
pub use report::{FailureReason, NetReport, NetStatus, RouteReport, UnroutedSink};

use aion_common::{AionResult, InternalError};
use aion_config::RouterConfig;
use aion_device::DeviceModel;
use aion_diagnostics::DiagnosticSink;

/// Routes every net of a design.
///
/// Per-pin and per-sink failures are reported to `sink` and recorded in the
/// returned [`RouteReport`]; the design keeps whatever PIPs were found. An
/// `Err` is returned only when the design's id tables are inconsistent.
pub fn route_design(
    design: &mut Design,
    device: &dyn DeviceModel,
    config: &RouterConfig,
    sink: &DiagnosticSink,
) -> AionResult<RouteReport> {
    check_ids(design)?;
    if design.part != device.part_name() {
        log::warn!(
            "design targets {} but device is {}",
            design.part,
            device.part_name()
        );
    }
    Ok(routing::route(design, device, config, sink))
}

/// Ids double as indices; anything else means the design was assembled
/// without [`Design::add_net`] / [`Design::add_instance`].
fn check_ids(design: &Design) -> AionResult<()> {
    for (index, net) in design.nets.iter().enumerate() {
        if net.id.as_raw() as usize != index {
            return Err(InternalError::new(format!(
                "net `{}` has id {} at index {index}",
                net.name, net.id
            )));
        }
    }
    for (index, instance) in design.instances.iter().enumerate() {
        if instance.id.as_raw() as usize != index {
            return Err(InternalError::new(format!(
                "instance `{}` has id {} at index {index}",
                instance.name, instance.id
            )));
        }
    }
    Ok(())
}
