//! # Symbol Graph Viewer
//!
//! Focus/selection state machine over an assembled graph, plus the
//! self-contained HTML page that mirrors it in the browser.
//!
//! ## State machine
//!
//! ```text
//! ViewState (selection, groups, labels, distance, charge)
//!     │
//!     ├──> handlers: select / toggle_group / set_* / reset / restore
//!     │      └─ mutate the state only
//!     │
//!     ├──> frame(): one pure recompute
//!     │      ├─ visible graph (group filter)
//!     │      ├─ focus: outbound / inbound / internal, neighbourhood
//!     │      └─ sidebar: selected, outgoing, incoming
//!     │
//!     └──> fragment: sel=..&groups=..&labels=..&dist=..&charge=..
//! ```
//!
//! ## Example
//!
//! ```
//! use symgraph_graph::Graph;
//! use symgraph_viewer::Viewer;
//!
//! let mut viewer = Viewer::new(Graph::default());
//! viewer.set_distance(500);
//! assert_eq!(viewer.state().distance, 300);
//! assert!(viewer.fragment().starts_with("sel=&groups=test,type"));
//! ```

mod engine;
mod error;
mod focus;
mod fragment;
mod graph_view;
mod group;
mod page;
mod state;

pub use engine::{Frame, FrameLink, FrameNode, Viewer};
pub use error::{Result, ViewerError};
pub use focus::{Focus, LinkClass, Sidebar};
pub use fragment::{decode as decode_fragment, encode as encode_fragment};
pub use graph_view::GraphView;
pub use group::Group;
pub use page::{render as render_page, DATA_PLACEHOLDER};
pub use state::{ViewState, CHARGE_RANGE, DEFAULT_CHARGE, DEFAULT_DISTANCE, DISTANCE_RANGE};
