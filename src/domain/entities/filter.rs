use std::collections::BTreeSet;

use chrono::NaiveDate;

/// Current sidebar selection. `None` leaves a dimension unrestricted,
/// `Some` of an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterState {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub stores: Option<BTreeSet<String>>,
    pub groups: Option<BTreeSet<String>>,
}

impl FilterState {
    pub fn is_unrestricted(&self) -> bool {
        self.date_range.is_none() && self.stores.is_none() && self.groups.is_none()
    }

    pub fn with_date_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.date_range = Some((start, end));
        self
    }

    pub fn with_stores<I, S>(mut self, stores: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stores = Some(stores.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_groups<I, S>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.groups = Some(groups.into_iter().map(Into::into).collect());
        self
    }
}
