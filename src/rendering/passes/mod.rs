pub mod cube_pass;
