mod geo;
mod post;

pub use geo::{BoundingBox, Coordinates, KILOMETERS_PER_DEGREE, degree_span, haversine_meters};
pub use post::Post;
