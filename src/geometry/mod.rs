pub mod raytrace;
