//! CLI command implementations.

pub(crate) mod compile;
pub(crate) mod publish;

pub(crate) use compile::CompileArgs;
pub(crate) use publish::PublishArgs;
