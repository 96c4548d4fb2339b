mod common;
mod psychotype;
