//! Shared listings view model.

use crate::place::Place;

/// The currently displayed set of places plus its loading flag.
///
/// `loading` is true for the whole span between a fetch being issued and
/// its resolution being applied; `items` is only ever replaced atomically
/// on resolution, never partially.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ListingsView {
    pub items: Vec<Place>,
    pub loading: bool,
}
