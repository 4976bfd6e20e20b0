pub mod lanczos;
