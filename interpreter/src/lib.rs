mod ast;
mod env;
mod error;
mod interpreter;
mod parser;
mod value;

pub use ast::Program;
pub use error::*;
pub use interpreter::*;
pub use parser::*;
pub use value::*;
