//! Recurring-event wizard admission control
//!
//! The wizard walks a draft through three steps: basic info, recurrence
//! pattern, details. `can_proceed` is the pure per-step gate; `can_submit`
//! additionally requires the wizard to be positioned on the final step, so a
//! "submit from the middle" is rejected even when every field already
//! validates. Moving backwards is never blocked.
//!
//! The gate never fails: an invalid or partially-filled draft simply yields
//! `false`. It is cheap enough to re-evaluate on every keystroke.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDate;

use detaildesk_domain::{EventDraft, ScheduleEventType};

use crate::ports::outbound::ClockPort;

/// Field-error map produced by an external schema-validation layer.
///
/// Keys are field paths (`"title"`, `"recurrence.interval"`,
/// `"visit_template.services"`); the gate only checks key presence per
/// scope, never the message content.
pub type FieldErrors = HashMap<String, String>;

/// Wizard steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WizardStep {
    BasicInfo,
    Recurrence,
    Details,
}

impl WizardStep {
    /// One-based position, matching how the steps are displayed.
    pub fn number(self) -> u8 {
        match self {
            Self::BasicInfo => 1,
            Self::Recurrence => 2,
            Self::Details => 3,
        }
    }

    pub fn next(self) -> Option<Self> {
        match self {
            Self::BasicInfo => Some(Self::Recurrence),
            Self::Recurrence => Some(Self::Details),
            Self::Details => None,
        }
    }

    pub fn previous(self) -> Option<Self> {
        match self {
            Self::BasicInfo => None,
            Self::Recurrence => Some(Self::BasicInfo),
            Self::Details => Some(Self::Recurrence),
        }
    }
}

/// Whether `errors` carries a key for `scope` itself or any field nested
/// under it.
fn scope_has_error(errors: &FieldErrors, scope: &str) -> bool {
    errors.keys().any(|key| {
        key.as_str() == scope
            || key
                .strip_prefix(scope)
                .is_some_and(|rest| rest.starts_with('.'))
    })
}

fn basics_ok(draft: &EventDraft) -> bool {
    draft.validate_basics().is_ok()
}

fn recurrence_ok(draft: &EventDraft, today: NaiveDate) -> bool {
    draft
        .recurrence
        .as_ref()
        .is_some_and(|pattern| pattern.validate(today).is_ok())
}

fn template_ok(draft: &EventDraft) -> bool {
    draft
        .visit_template
        .as_ref()
        .is_some_and(|template| template.validate().is_ok())
}

/// Per-step gate: may the user advance past `step` with this draft?
///
/// Pure and total over all draft shapes; `today` anchors the end-date
/// check.
pub fn can_proceed(
    step: WizardStep,
    draft: &EventDraft,
    errors: &FieldErrors,
    today: NaiveDate,
) -> bool {
    match step {
        WizardStep::BasicInfo => {
            basics_ok(draft)
                && !errors.contains_key("title")
                && !errors.contains_key("description")
                && !errors.contains_key("event_type")
        }
        WizardStep::Recurrence => {
            recurrence_ok(draft, today) && !scope_has_error(errors, "recurrence")
        }
        WizardStep::Details => match draft.event_type {
            None => false,
            // A simple event needs no template; template errors are ignored
            // for this branch.
            Some(ScheduleEventType::SimpleEvent) => {
                basics_ok(draft)
                    && recurrence_ok(draft, today)
                    && !errors.contains_key("title")
                    && !errors.contains_key("event_type")
                    && !scope_has_error(errors, "recurrence")
            }
            Some(ScheduleEventType::RecurringVisit) => {
                template_ok(draft) && !scope_has_error(errors, "visit_template")
            }
        },
    }
}

/// Whole-form gate: submission is only allowed from the final step.
pub fn can_submit(
    current_step: WizardStep,
    draft: &EventDraft,
    errors: &FieldErrors,
    today: NaiveDate,
) -> bool {
    current_step == WizardStep::Details && can_proceed(WizardStep::Details, draft, errors, today)
}

/// Stateful wrapper driving a draft through the wizard.
pub struct EventWizard {
    clock: Arc<dyn ClockPort>,
    step: WizardStep,
    draft: EventDraft,
    errors: FieldErrors,
}

impl EventWizard {
    pub fn new(clock: Arc<dyn ClockPort>) -> Self {
        Self {
            clock,
            step: WizardStep::BasicInfo,
            draft: EventDraft::default(),
            errors: FieldErrors::new(),
        }
    }

    pub fn current_step(&self) -> WizardStep {
        self.step
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    /// Mutable access for field-by-field edits.
    pub fn draft_mut(&mut self) -> &mut EventDraft {
        &mut self.draft
    }

    /// Replace the error map from the external validation layer.
    pub fn set_field_errors(&mut self, errors: FieldErrors) {
        self.errors = errors;
    }

    pub fn can_advance(&self) -> bool {
        can_proceed(self.step, &self.draft, &self.errors, self.today())
    }

    /// Move to the next step if the current one's gate passes.
    pub fn advance(&mut self) -> bool {
        if !self.can_advance() {
            return false;
        }
        match self.step.next() {
            Some(next) => {
                self.step = next;
                true
            }
            None => false,
        }
    }

    /// Move back one step. Never blocked.
    pub fn back(&mut self) -> bool {
        match self.step.previous() {
            Some(previous) => {
                self.step = previous;
                true
            }
            None => false,
        }
    }

    pub fn can_submit(&self) -> bool {
        can_submit(self.step, &self.draft, &self.errors, self.today())
    }

    /// Take the draft for submission, resetting the wizard to a fresh
    /// state. Returns `None` when the submit gate rejects.
    pub fn submit(&mut self) -> Option<EventDraft> {
        if !self.can_submit() {
            return None;
        }
        let draft = std::mem::take(&mut self.draft);
        self.reset();
        Some(draft)
    }

    /// Discard the draft and start over.
    pub fn cancel(&mut self) {
        self.draft = EventDraft::default();
        self.reset();
    }

    fn reset(&mut self) {
        self.step = WizardStep::BasicInfo;
        self.errors.clear();
    }

    fn today(&self) -> NaiveDate {
        self.clock.now().date_naive()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use detaildesk_domain::{
        DayOfWeek, RecurrencePattern, ScheduleEventType, ServiceItem, VisitTemplate,
    };

    use super::*;
    use crate::infrastructure::clock::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 10).expect("valid date")
    }

    fn fixed_clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(
            Utc.with_ymd_and_hms(2025, 3, 10, 12, 0, 0).unwrap(),
        ))
    }

    fn simple_draft() -> EventDraft {
        EventDraft {
            title: "Abc".to_string(),
            description: None,
            event_type: Some(ScheduleEventType::SimpleEvent),
            recurrence: Some(RecurrencePattern::weekly(1, vec![DayOfWeek::Tuesday])),
            visit_template: None,
        }
    }

    fn visit_draft() -> EventDraft {
        EventDraft {
            title: "Weekly fleet wash".to_string(),
            description: Some("Six vans, exterior only".to_string()),
            event_type: Some(ScheduleEventType::RecurringVisit),
            recurrence: Some(RecurrencePattern::weekly(1, vec![DayOfWeek::Monday])),
            visit_template: Some(VisitTemplate::new(
                90,
                vec![ServiceItem::new("Exterior wash", 45.0)],
            )),
        }
    }

    #[test]
    fn simple_event_bypasses_the_template_requirement() {
        let draft = simple_draft();
        assert!(can_proceed(
            WizardStep::Details,
            &draft,
            &FieldErrors::new(),
            today()
        ));
    }

    #[test]
    fn recurring_visit_without_template_is_rejected() {
        let mut draft = visit_draft();
        draft.visit_template = None;
        assert!(!can_proceed(
            WizardStep::Details,
            &draft,
            &FieldErrors::new(),
            today()
        ));
    }

    #[test]
    fn recurring_visit_with_valid_template_passes() {
        assert!(can_proceed(
            WizardStep::Details,
            &visit_draft(),
            &FieldErrors::new(),
            today()
        ));
    }

    #[test]
    fn template_errors_are_ignored_for_simple_events() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "visit_template.services".to_string(),
            "at least one service".to_string(),
        );

        assert!(can_proceed(
            WizardStep::Details,
            &simple_draft(),
            &errors,
            today()
        ));
        assert!(!can_proceed(
            WizardStep::Details,
            &visit_draft(),
            &errors,
            today()
        ));
    }

    #[test]
    fn basic_info_requires_title_and_type() {
        let mut draft = simple_draft();
        assert!(can_proceed(
            WizardStep::BasicInfo,
            &draft,
            &FieldErrors::new(),
            today()
        ));

        draft.title = "Ab".to_string();
        assert!(!can_proceed(
            WizardStep::BasicInfo,
            &draft,
            &FieldErrors::new(),
            today()
        ));

        let mut no_type = simple_draft();
        no_type.event_type = None;
        assert!(!can_proceed(
            WizardStep::BasicInfo,
            &no_type,
            &FieldErrors::new(),
            today()
        ));
    }

    #[test]
    fn a_field_error_blocks_basic_info() {
        let mut errors = FieldErrors::new();
        errors.insert("title".to_string(), "already taken".to_string());
        assert!(!can_proceed(
            WizardStep::BasicInfo,
            &simple_draft(),
            &errors,
            today()
        ));
    }

    #[test]
    fn mutually_exclusive_end_conditions_block_the_recurrence_step() {
        let mut draft = simple_draft();
        if let Some(pattern) = draft.recurrence.as_mut() {
            pattern.end_date = NaiveDate::from_ymd_opt(2025, 6, 1);
            pattern.max_occurrences = Some(10);
        }
        assert!(!can_proceed(
            WizardStep::Recurrence,
            &draft,
            &FieldErrors::new(),
            today()
        ));
    }

    #[test]
    fn scoped_errors_block_the_recurrence_step() {
        let mut errors = FieldErrors::new();
        errors.insert("recurrence.interval".to_string(), "too small".to_string());
        assert!(!can_proceed(
            WizardStep::Recurrence,
            &simple_draft(),
            &errors,
            today()
        ));

        // An unrelated prefix does not count as the scope.
        let mut unrelated = FieldErrors::new();
        unrelated.insert("recurrences".to_string(), "bogus".to_string());
        assert!(can_proceed(
            WizardStep::Recurrence,
            &simple_draft(),
            &unrelated,
            today()
        ));
    }

    #[test]
    fn submit_is_rejected_below_the_final_step() {
        let draft = visit_draft();
        let errors = FieldErrors::new();

        assert!(!can_submit(WizardStep::BasicInfo, &draft, &errors, today()));
        assert!(!can_submit(WizardStep::Recurrence, &draft, &errors, today()));
        assert!(can_submit(WizardStep::Details, &draft, &errors, today()));
    }

    #[test]
    fn wizard_walks_forward_only_through_open_gates() {
        let mut wizard = EventWizard::new(fixed_clock());

        // Empty draft: gate closed.
        assert!(!wizard.advance());
        assert_eq!(wizard.current_step(), WizardStep::BasicInfo);

        *wizard.draft_mut() = visit_draft();
        assert!(wizard.advance());
        assert!(wizard.advance());
        assert_eq!(wizard.current_step(), WizardStep::Details);

        // Forward motion ends at the final step.
        assert!(!wizard.advance());
    }

    #[test]
    fn back_navigation_is_never_blocked() {
        let mut wizard = EventWizard::new(fixed_clock());
        *wizard.draft_mut() = visit_draft();
        wizard.advance();
        wizard.advance();

        // Invalidate the draft entirely; back still works.
        wizard.draft_mut().title.clear();
        assert!(wizard.back());
        assert!(wizard.back());
        assert_eq!(wizard.current_step(), WizardStep::BasicInfo);
        assert!(!wizard.back());
    }

    #[test]
    fn submit_only_from_the_final_step() {
        let mut wizard = EventWizard::new(fixed_clock());
        *wizard.draft_mut() = visit_draft();

        // All predicates hold, but the wizard sits on step one.
        assert!(wizard.submit().is_none());

        wizard.advance();
        wizard.advance();
        let draft = wizard.submit().expect("submit from the final step");
        assert_eq!(draft.title, "Weekly fleet wash");

        // Submission resets the wizard.
        assert_eq!(wizard.current_step(), WizardStep::BasicInfo);
        assert_eq!(wizard.draft(), &EventDraft::default());
    }

    #[test]
    fn stale_field_errors_gate_the_wizard_until_replaced() {
        let mut wizard = EventWizard::new(fixed_clock());
        *wizard.draft_mut() = visit_draft();

        let mut errors = FieldErrors::new();
        errors.insert("title".to_string(), "already taken".to_string());
        wizard.set_field_errors(errors);
        assert!(!wizard.advance());

        wizard.set_field_errors(FieldErrors::new());
        assert!(wizard.advance());
    }
}
