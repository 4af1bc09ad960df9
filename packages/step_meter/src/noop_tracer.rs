use std::path::Path;

use crate::{MethodTracer, Result};

/// Tracer that does nothing. Used until a real tracer is installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl MethodTracer for NoopTracer {
    fn start_tracing(&mut self, _path: &Path) -> Result<()> {
        Ok(())
    }

    fn stop_tracing(&mut self) -> Result<()> {
        Ok(())
    }
}
