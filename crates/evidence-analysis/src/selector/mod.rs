//! Method selection: decides which procedure a request's data shape calls for.

pub mod rules;
pub mod series;

pub use rules::{select, MethodChoice};
pub use series::{CategoricalSeries, NumericSeries, TypedVariable};
