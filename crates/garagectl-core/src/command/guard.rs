use crate::store::ViewStore;

/// Holds the view in "operating" until dropped.
///
/// Dropping runs on every exit path, including unwinding, so the flag
/// can never be left set.
pub(super) struct OperationGuard<'a> {
    view: &'a ViewStore,
}

impl<'a> OperationGuard<'a> {
    pub(super) fn begin(view: &'a ViewStore, message: String) -> Self {
        view.begin_operation(message);
        Self { view }
    }
}

impl Drop for OperationGuard<'_> {
    fn drop(&mut self) {
        self.view.end_operation();
    }
}
