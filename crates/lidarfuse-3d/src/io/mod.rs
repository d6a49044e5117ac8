/// PLY file format support.
pub mod ply;
