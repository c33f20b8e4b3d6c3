use std::sync::{Arc, Mutex, PoisonError};

use super::template::ProgramTemplate;
use crate::error::ClipError;

/// Process-wide clip program. Built by the first effect, dropped by
/// [`release_shared_template`].
static SHARED: Mutex<Option<Arc<ProgramTemplate>>> = Mutex::new(None);

/// Returns the shared template, building it on first call.
///
/// Concurrent first calls are serialised; exactly one template is built.
pub fn shared_template() -> Result<Arc<ProgramTemplate>, ClipError> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(template) = slot.as_ref() {
        return Ok(Arc::clone(template));
    }

    let template = Arc::new(ProgramTemplate::new()?);
    log::debug!("clip program template created");
    *slot = Some(Arc::clone(&template));
    Ok(template)
}

/// Drops the registry's handle to the shared template.
///
/// Call at process shutdown, after the device is gone or about to go.
/// Effects still alive keep their own handle; the next [`shared_template`]
/// call builds a fresh template. Returns whether a template was registered.
pub fn release_shared_template() -> bool {
    let released = SHARED.lock().unwrap_or_else(PoisonError::into_inner).take();
    if let Some(template) = &released {
        log::debug!(
            "clip program template released ({} other handle(s) outstanding)",
            Arc::strong_count(template) - 1
        );
    }
    released.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Single test: the registry is process-global and tests run in parallel.
    #[test]
    fn shared_template_lifecycle() {
        let a = shared_template().unwrap();
        let b = shared_template().unwrap();
        assert!(Arc::ptr_eq(&a, &b));

        assert!(release_shared_template());
        let c = shared_template().unwrap();
        assert!(!Arc::ptr_eq(&a, &c));
        // Old handles stay usable after release.
        assert_eq!(a.locations(), c.locations());
    }
}
