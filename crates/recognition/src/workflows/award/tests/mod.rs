mod common;
mod rating;
mod routing;
mod scoring;
