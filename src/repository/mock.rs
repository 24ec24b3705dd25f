//! Mock repository implementations for isolating services in tests.

use chrono::NaiveDateTime;
use mockall::mock;

use crate::domain::activity::{
    Appointment, Call, Email, NewAppointment, NewCall, NewEmail, UpdateAppointment,
};
use crate::domain::bulk::BulkSelection;
use crate::domain::deal::{Deal, DealWithRelations, NewDeal, UpdateDeal};
use crate::domain::deal_category::{DealStage, DealType};
use crate::domain::group::{GroupInput, Pond, Team, WithMembers};
use crate::domain::lead_flow_rule::{LeadFlowRule, NewLeadFlowRule, UpdateLeadFlowRule};
use crate::domain::person::{NewPerson, Person, PersonAssignment, UpdatePerson};
use crate::domain::report::{ActivityReportRow, PipelineReportRow};
use crate::domain::types::{
    AppointmentId, CallId, CategoryName, DealId, DealStageId, DealTypeId, EmailId, HubId,
    LeadFlowRuleId, PersonId, PondId, TeamId, UserEmail, UserId,
};
use crate::domain::user::{NewUser, User};
use crate::repository::errors::RepositoryResult;
use crate::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, DealCategoryReader, DealCategoryWriter,
    DealListQuery, DealReader, DealWriter, GroupReader, GroupWriter, LeadFlowRuleReader,
    LeadFlowRuleWriter, PersonListQuery, PersonReader, PersonWriter, ReportReader, UserReader,
    UserWriter,
};

mock! {
    pub Repository {}

    impl UserReader for Repository {
        fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
        fn get_user_by_email(
            &self,
            email: &UserEmail,
            hub_id: HubId,
        ) -> RepositoryResult<Option<User>>;
        fn list_users(&self, hub_id: HubId) -> RepositoryResult<Vec<User>>;
    }

    impl UserWriter for Repository {
        fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
    }

    impl PersonReader for Repository {
        fn get_person_by_id(&self, id: PersonId, hub_id: HubId) -> RepositoryResult<Option<Person>>;
        fn list_people(&self, query: PersonListQuery) -> RepositoryResult<(usize, Vec<Person>)>;
    }

    impl PersonWriter for Repository {
        fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person>;
        fn create_people(&self, new_people: &[NewPerson]) -> RepositoryResult<usize>;
        fn create_routed_person(
            &self,
            new_person: &NewPerson,
            team_id: Option<TeamId>,
        ) -> RepositoryResult<Person>;
        fn update_person(
            &self,
            id: PersonId,
            hub_id: HubId,
            updates: &UpdatePerson,
        ) -> RepositoryResult<Person>;
        fn assign_person(
            &self,
            id: PersonId,
            hub_id: HubId,
            assignment: &PersonAssignment,
        ) -> RepositoryResult<Person>;
        fn delete_person(&self, id: PersonId, hub_id: HubId) -> RepositoryResult<()>;
        fn delete_people(
            &self,
            hub_id: HubId,
            selection: &BulkSelection<PersonId>,
        ) -> RepositoryResult<usize>;
    }

    impl LeadFlowRuleReader for Repository {
        fn list_lead_flow_rules(&self, hub_id: HubId) -> RepositoryResult<Vec<LeadFlowRule>>;
        fn get_lead_flow_rule_by_id(
            &self,
            id: LeadFlowRuleId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<LeadFlowRule>>;
    }

    impl LeadFlowRuleWriter for Repository {
        fn create_lead_flow_rule(&self, rule: &NewLeadFlowRule) -> RepositoryResult<LeadFlowRule>;
        fn update_lead_flow_rule(
            &self,
            id: LeadFlowRuleId,
            hub_id: HubId,
            updates: &UpdateLeadFlowRule,
        ) -> RepositoryResult<LeadFlowRule>;
        fn delete_lead_flow_rule(&self, id: LeadFlowRuleId, hub_id: HubId) -> RepositoryResult<()>;
        fn reorder_lead_flow_rule(
            &self,
            id: LeadFlowRuleId,
            hub_id: HubId,
            position: usize,
        ) -> RepositoryResult<Vec<LeadFlowRule>>;
    }

    impl DealReader for Repository {
        fn get_deal_by_id(
            &self,
            id: DealId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<DealWithRelations>>;
        fn list_deals(&self, query: DealListQuery) -> RepositoryResult<(usize, Vec<Deal>)>;
    }

    impl DealWriter for Repository {
        fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal>;
        fn update_deal(
            &self,
            id: DealId,
            hub_id: HubId,
            updates: &UpdateDeal,
        ) -> RepositoryResult<Deal>;
        fn delete_deal(&self, id: DealId, hub_id: HubId) -> RepositoryResult<()>;
        fn delete_deals(
            &self,
            hub_id: HubId,
            selection: &BulkSelection<DealId>,
        ) -> RepositoryResult<usize>;
    }

    impl DealCategoryReader for Repository {
        fn list_deal_stages(&self, hub_id: HubId) -> RepositoryResult<Vec<DealStage>>;
        fn get_deal_stage(
            &self,
            id: DealStageId,
            hub_id: HubId,
        ) -> RepositoryResult<Option<DealStage>>;
        fn list_deal_types(&self, hub_id: HubId) -> RepositoryResult<Vec<DealType>>;
        fn get_deal_type(&self, id: DealTypeId, hub_id: HubId) -> RepositoryResult<Option<DealType>>;
    }

    impl DealCategoryWriter for Repository {
        fn create_deal_stage(
            &self,
            hub_id: HubId,
            name: &CategoryName,
        ) -> RepositoryResult<DealStage>;
        fn rename_deal_stage(
            &self,
            id: DealStageId,
            hub_id: HubId,
            name: &CategoryName,
        ) -> RepositoryResult<DealStage>;
        fn delete_deal_stage(&self, id: DealStageId, hub_id: HubId) -> RepositoryResult<()>;
        fn reorder_deal_stage(
            &self,
            id: DealStageId,
            hub_id: HubId,
            position: usize,
        ) -> RepositoryResult<Vec<DealStage>>;
        fn create_deal_type(&self, hub_id: HubId, name: &CategoryName) -> RepositoryResult<DealType>;
        fn rename_deal_type(
            &self,
            id: DealTypeId,
            hub_id: HubId,
            name: &CategoryName,
        ) -> RepositoryResult<DealType>;
        fn delete_deal_type(&self, id: DealTypeId, hub_id: HubId) -> RepositoryResult<()>;
        fn reorder_deal_type(
            &self,
            id: DealTypeId,
            hub_id: HubId,
            position: usize,
        ) -> RepositoryResult<Vec<DealType>>;
    }

    impl ActivityReader for Repository {
        fn list_calls(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Call>)>;
        fn list_emails(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Email>)>;
        fn list_appointments(
            &self,
            query: ActivityListQuery,
        ) -> RepositoryResult<(usize, Vec<Appointment>)>;
    }

    impl ActivityWriter for Repository {
        fn create_call(&self, call: &NewCall) -> RepositoryResult<Call>;
        fn delete_call(&self, id: CallId, person_id: PersonId, hub_id: HubId)
            -> RepositoryResult<()>;
        fn create_email(&self, email: &NewEmail) -> RepositoryResult<Email>;
        fn delete_email(&self, id: EmailId, person_id: PersonId, hub_id: HubId)
            -> RepositoryResult<()>;
        fn create_appointment(&self, appointment: &NewAppointment) -> RepositoryResult<Appointment>;
        fn update_appointment(
            &self,
            id: AppointmentId,
            person_id: PersonId,
            hub_id: HubId,
            updates: &UpdateAppointment,
        ) -> RepositoryResult<Appointment>;
        fn delete_appointment(
            &self,
            id: AppointmentId,
            person_id: PersonId,
            hub_id: HubId,
        ) -> RepositoryResult<()>;
    }

    impl GroupReader for Repository {
        fn list_ponds(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Pond>>>;
        fn get_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Pond>>>;
        fn list_teams(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Team>>>;
        fn get_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Team>>>;
    }

    impl GroupWriter for Repository {
        fn create_pond(&self, input: &GroupInput) -> RepositoryResult<Pond>;
        fn update_pond(&self, id: PondId, input: &GroupInput) -> RepositoryResult<Pond>;
        fn delete_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<()>;
        fn create_team(&self, input: &GroupInput) -> RepositoryResult<Team>;
        fn update_team(&self, id: TeamId, input: &GroupInput) -> RepositoryResult<Team>;
        fn delete_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<()>;
    }

    impl ReportReader for Repository {
        fn activity_report(
            &self,
            hub_id: HubId,
            from: NaiveDateTime,
            to: NaiveDateTime,
        ) -> RepositoryResult<Vec<ActivityReportRow>>;
        fn pipeline_report(&self, hub_id: HubId) -> RepositoryResult<Vec<PipelineReportRow>>;
    }
}
