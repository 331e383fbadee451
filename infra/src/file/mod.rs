pub mod csv;
pub mod dens;
pub mod profiles;
