/// The three pages of the browser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    List,
    Wishlist,
    Detail(u64),
}

impl View {
    /// Top-level views addressable by name; detail views need a book id.
    pub fn from_name(name: &str) -> Option<View> {
        match name {
            "list" | "home" => Some(View::List),
            "wishlist" => Some(View::Wishlist),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            View::List => "list",
            View::Wishlist => "wishlist",
            View::Detail(_) => "detail",
        }
    }

    pub fn is_detail(self) -> bool {
        matches!(self, View::Detail(_))
    }
}

/// Active view plus the single view "back" returns to. `previous` never
/// holds a detail view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Navigation {
    active: View,
    previous: View,
}

impl Default for Navigation {
    fn default() -> Self {
        Self {
            active: View::List,
            previous: View::List,
        }
    }
}

impl Navigation {
    pub fn active(&self) -> View {
        self.active
    }

    pub fn show(&mut self, view: View) {
        match view {
            View::Detail(id) => self.open_detail(id),
            top => {
                self.active = top;
                self.previous = top;
            }
        }
    }

    pub fn open_detail(&mut self, id: u64) {
        if !self.active.is_detail() {
            self.previous = self.active;
        }
        self.active = View::Detail(id);
    }

    /// Leave a detail view; returns false when there is nothing to go back from.
    pub fn back(&mut self) -> bool {
        if !self.active.is_detail() {
            return false;
        }
        self.active = self.previous;
        true
    }
}
