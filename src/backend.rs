use mathphysics::Meter;


pub mod allocator;
pub mod candidates;
pub mod connections;
pub mod editor;
pub mod mathphysics;
pub mod metrics;
pub mod networkmodel;
pub mod optimizer;
pub mod radio;
pub mod site;


// Fraction of the combined coverage reach that must stay clear before two
// cells count as a usable handover pair.
pub const HANDOVER_MARGIN: f32 = 0.10;

// Antenna heights are planning constants supplied per computation, not
// per-site attributes.
pub const MAST_HEIGHT: Meter   = 200.0;
pub const MOBILE_HEIGHT: Meter = 1.5;
