pub(crate) mod breakdown;
pub(crate) mod chart;
pub(crate) mod editor;
