pub mod prefs;
pub mod source;
