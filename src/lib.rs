pub mod constants;
pub mod daisy_errors;
pub mod decomposition;
pub mod geodesy;
pub mod io;
pub mod orbit;
pub mod packed_matrix;
pub mod params;
pub mod pipeline;
pub mod scatterers;
