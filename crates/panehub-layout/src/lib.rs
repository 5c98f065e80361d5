//! Panel arrangement engine for panehub.
//!
//! Panels are kept in one logical order and cut into lines by
//! [`LineCapacities`]. The lines are mounted as nested splitters whose sizes
//! can be captured into a [`SplitTree`], restored after a structural change,
//! and persisted inside a [`LayoutSnapshot`].

mod arrangement;
mod capacity;
mod error;
mod grid;
mod snapshot;
mod split;
mod store;

pub use arrangement::{Arrangement, RebuildPhase};
pub use capacity::{LayoutMode, LineCapacities, DEFAULT_CAPACITY};
pub use error::LayoutError;
pub use grid::build_grid;
pub use snapshot::LayoutSnapshot;
pub use split::{Orientation, SplitChild, SplitNode, SplitTree};
pub use store::{
    FavoriteEntry, LayoutStore, DEFAULT_FAVORITE_COLOR, DEFAULT_PATH_FAVORITE_COLOR,
    FAVORITES_FILE, FAVORITE_LAYOUTS_DIR, PATH_FAVORITES_FILE, SESSION_FILE,
};
