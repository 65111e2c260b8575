//! The individual pipeline stages, in execution order.

pub mod extend_lines;
pub mod filter_text;
pub mod init_graph;
pub mod candidates;
pub mod create_lines;
pub mod connect_closest;
pub mod connect_close_symbols;
pub mod arrows;
pub mod classify_assets;
pub mod connectivity;
pub mod assemble;

pub use arrows::connect_lines_with_arrows;
pub use assemble::build_connected_symbols;
pub use candidates::create_line_connection_candidates;
pub use classify_assets::{classify_asset_symbols, AssetClassification};
pub use connect_close_symbols::connect_symbols_that_are_close;
pub use connect_closest::connect_lines_with_closest_elements;
pub use connectivity::find_symbol_connectivities;
pub use extend_lines::extend_lines;
pub use filter_text::remove_text_outside_inclusive_box;
pub use init_graph::initialize_graph;
