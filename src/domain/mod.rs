// Domain layer - Readings, normalization and axis scaling
pub mod bounds;
pub mod reading;
pub mod series;
pub mod status;
pub mod time_format;
