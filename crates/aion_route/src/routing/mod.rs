//! Maze routing engine.
//!
//! Routes every net of a placed design through the device wire graph, one
//! sink at a time, with a lowest-cost-first search per sink. Wire usage is
//! exclusive between signal nets and shared within a static (power or
//! ground) group. There is no rip-up: a sink that cannot be reached is
//! reported and left unrouted.

mod history;
mod maze;
mod node;
mod search;
mod state;
mod statics;

use crate::design::Design;
use crate::report::RouteReport;
use aion_config::RouterConfig;
use aion_device::DeviceModel;
use aion_diagnostics::DiagnosticSink;

/// Routes all nets in the design, appending PIPs to each net.
pub(crate) fn route(
    design: &mut Design,
    device: &dyn DeviceModel,
    config: &RouterConfig,
    sink: &DiagnosticSink,
) -> RouteReport {
    maze::MazeRouter::new(device, config, sink).run(design)
}
