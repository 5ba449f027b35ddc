// Infrastructure implementations for typescope.

pub mod java_parser;
pub mod sink;

pub use java_parser::TreeSitterJavaParser;
pub use sink::WriterSink;
