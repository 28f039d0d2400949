// Editing tabs, in display order.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tab {
    #[default]
    Retouch,
    Adjust,
    Filters,
    Crop,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Retouch, Tab::Adjust, Tab::Filters, Tab::Crop];

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Retouch => "Retouch",
            Tab::Adjust => "Adjust",
            Tab::Filters => "Filters",
            Tab::Crop => "Crop",
        }
    }

    fn index(&self) -> usize {
        Tab::ALL.iter().position(|t| t == self).unwrap_or(0)
    }

    /// The tab to the right, or `None` at the end. No wrap-around.
    pub fn next(&self) -> Option<Tab> {
        Tab::ALL.get(self.index() + 1).copied()
    }

    pub fn previous(&self) -> Option<Tab> {
        self.index().checked_sub(1).map(|i| Tab::ALL[i])
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
