//! Runtime hand-off: static initialization, application entry, exit.

/// Language runtime and application entry.
pub trait Runtime {
    /// Run global/static initializers and constructors.
    fn init_globals(&mut self);

    /// Call the application entry point.
    ///
    /// Not expected to return in normal operation. If it does, the caller
    /// terminates the process through [`Runtime::exit`].
    fn run_application(&mut self);

    /// Terminate with `code`.
    fn exit(&mut self, code: i32) -> !;
}
