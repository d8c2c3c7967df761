pub mod clock;
pub mod dispatch;
pub mod ecs;
pub mod errors;
pub mod fleet;
pub mod network;
pub mod queue;
pub mod routing;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
