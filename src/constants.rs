//! Shared application-wide constants.
//! Centralizes tweakable values used across the diagram model, hit testing and rendering.

// Node dimensions
/// Node bounding-box width in world units. All node kinds share one fixed size.
pub const NODE_WIDTH: f32 = 100.0;
/// Node bounding-box height in world units.
pub const NODE_HEIGHT: f32 = 60.0;

// Ports
/// Radius of the invisible hit circle around a port center.
pub const PORT_HIT_RADIUS: f32 = 12.0;
/// Radius of the visible port ring outline.
pub const PORT_RING_RADIUS: f32 = 8.0;
/// Radius of the indicator dot shown while a port is hovered or connected.
pub const PORT_DOT_RADIUS: f32 = 2.5;

// Connections
/// Stroke width of an unselected connection line.
pub const CONNECTION_STROKE_WIDTH: f32 = 2.8;
/// Stroke width of the selected connection line.
pub const CONNECTION_SELECTED_STROKE_WIDTH: f32 = 4.0;
/// Maximum distance (world units) from a connection line that still counts as a hit.
pub const CONNECTION_HIT_THRESHOLD: f32 = 6.0;

// Drag preview
/// Stroke width of the dashed connect-drag preview line.
pub const TEMP_LINE_STROKE_WIDTH: f32 = 3.0;
/// Dash length of the connect-drag preview line.
pub const TEMP_LINE_DASH: f32 = 4.0;
/// Gap length between dashes of the connect-drag preview line.
pub const TEMP_LINE_GAP: f32 = 3.0;

// Node frame
/// Border stroke width of an unselected node.
pub const NODE_BORDER_WIDTH: f32 = 2.0;
/// Border stroke width of the selected node.
pub const NODE_SELECTED_BORDER_WIDTH: f32 = 3.0;

// Node creation
/// Vertical offset (world units) at which the paired Error Received node is
/// spawned below an Error node.
pub const ERROR_RECEIVED_SPAWN_OFFSET_Y: f32 = 100.0;

// Grid/drawing
/// Grid cell size in world units.
pub const GRID_SIZE: f32 = 20.0;
/// Number of grid cells between thicker grid lines.
pub const GRID_WIDTH: usize = 5;
