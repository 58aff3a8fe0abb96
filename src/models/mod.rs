pub mod donations;
pub mod event_occurrences;
pub mod event_templates;
pub mod milestones;
pub mod participants;
pub mod registrations;
pub mod surveys;

pub use donations::{DonationRow, DonationWithDonorRow};
pub use event_occurrences::{EventOccurrenceRow, OccurrenceWithTemplateRow};
pub use event_templates::EventTemplateRow;
pub use milestones::{
    AchievementWithTitleRow, MilestoneAchieverRow, MilestoneRow, ParticipantMilestoneRow,
};
pub use participants::{ParticipantRow, Role};
pub use registrations::{RegistrationRow, RegistrationWithEventRow};
pub use surveys::{SurveyAnswerRow, SurveyHeaderRow, SurveyListRow, UserSurveyRow};
