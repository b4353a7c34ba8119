pub use crate::chorus_group::Entity as ChorusGroup;
pub use crate::chorus_member::Entity as ChorusMember;
pub use crate::group_alltime_entry::Entity as GroupAlltimeEntry;
pub use crate::group_entry_history::Entity as GroupEntryHistory;
pub use crate::group_generation_state::Entity as GroupGenerationState;
pub use crate::group_member_contribution::Entity as GroupMemberContribution;
pub use crate::group_record::Entity as GroupRecord;
pub use crate::group_week_chart::Entity as GroupWeekChart;
pub use crate::group_week_entry::Entity as GroupWeekEntry;
pub use crate::member_week_play::Entity as MemberWeekPlay;
pub use crate::member_week_score::Entity as MemberWeekScore;
pub use crate::member_week_snapshot::Entity as MemberWeekSnapshot;
