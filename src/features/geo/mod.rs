pub mod client;

pub use client::{reverse_geocode, Geocoder};
