pub mod ast;
pub mod validator;
pub mod builders;
pub mod compiler;
