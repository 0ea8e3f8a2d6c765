//! One-at-a-time presentation of a child screen.
//!
//! A parent screen keeps a [`Presenter`] for each kind of child it can
//! show. Driving it from an observation with the current item (present
//! when an item appears, dismiss when it goes away) keeps at most one
//! child alive. There is no stack and no replace-in-place.

/// What a call to [`Presenter::present`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation {
    Presented,
    Dismissed,
    Unchanged,
}

/// Slot holding the currently presented child, if any.
#[derive(Debug)]
pub struct Presenter<S> {
    presented: Option<S>,
}

impl<S> Default for Presenter<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> Presenter<S> {
    pub fn new() -> Self {
        Self { presented: None }
    }

    /// Present `content(item)` when an item appears and nothing is shown;
    /// dismiss the shown child when the item is gone. Anything else is a
    /// no-op, including a different item arriving while a child is shown.
    pub fn present<I>(&mut self, item: Option<I>, content: impl FnOnce(I) -> S) -> Presentation {
        match (item, self.presented.is_some()) {
            (Some(item), false) => {
                self.presented = Some(content(item));
                Presentation::Presented
            }
            (None, true) => {
                self.presented = None;
                Presentation::Dismissed
            }
            _ => Presentation::Unchanged,
        }
    }

    /// Dismiss regardless of the item, e.g. on user request.
    pub fn dismiss(&mut self) -> Option<S> {
        self.presented.take()
    }

    pub fn presented(&self) -> Option<&S> {
        self.presented.as_ref()
    }

    pub fn presented_mut(&mut self) -> Option<&mut S> {
        self.presented.as_mut()
    }

    pub fn is_presenting(&self) -> bool {
        self.presented.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presents_when_item_appears() {
        let mut presenter = Presenter::new();
        let result = presenter.present(Some(3), |n| format!("child {n}"));
        assert_eq!(result, Presentation::Presented);
        assert_eq!(presenter.presented().map(String::as_str), Some("child 3"));
    }

    #[test]
    fn second_item_while_presenting_is_ignored() {
        let mut presenter = Presenter::new();
        presenter.present(Some(1), |n| n * 10);
        let result = presenter.present(Some(2), |_| panic!("factory must not run"));
        assert_eq!(result, Presentation::Unchanged);
        assert_eq!(presenter.presented(), Some(&10));
    }

    #[test]
    fn dismisses_when_item_goes_away() {
        let mut presenter = Presenter::new();
        presenter.present(Some(1), |n| n);
        assert_eq!(presenter.present(None::<i32>, |n| n), Presentation::Dismissed);
        assert!(!presenter.is_presenting());
    }

    #[test]
    fn dismiss_when_empty_is_noop() {
        let mut presenter: Presenter<i32> = Presenter::new();
        assert_eq!(presenter.present(None::<i32>, |n| n), Presentation::Unchanged);
        assert_eq!(presenter.dismiss(), None);
    }

    #[test]
    fn can_present_again_after_dismiss() {
        let mut presenter = Presenter::new();
        presenter.present(Some("a"), str::to_string);
        presenter.present(None, str::to_string);
        assert_eq!(
            presenter.present(Some("b"), str::to_string),
            Presentation::Presented
        );
        assert_eq!(presenter.presented().map(String::as_str), Some("b"));
    }
}
