//! Persistence layer: reader/writer traits and their Diesel implementation.

use chrono::NaiveDateTime;

use crate::db::{DbConnection, DbPool};
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

pub mod activity;
pub mod deal;
pub mod deal_category;
pub mod errors;
pub mod group;
pub mod lead_flow_rule;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mock;
pub mod person;
pub mod report;
pub mod user;

/// Diesel-backed repository shared by every handler.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
}

impl DieselRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> RepositoryResult<DbConnection> {
        let conn = self.pool.get().map_err(|e| {
            log::error!("Failed to get connection from pool: {e}");
            e
        })?;
        Ok(conn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: usize,
    pub per_page: usize,
}

impl Pagination {
    pub(crate) fn offset(&self) -> i64 {
        ((self.page.max(1) - 1) * self.per_page) as i64
    }

    pub(crate) fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

#[derive(Debug, Clone)]
pub struct PersonListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub stage: Option<String>,
    pub source: Option<String>,
    pub assigned_user_id: Option<UserId>,
    pub pond_id: Option<PondId>,
    pub unassigned: bool,
    pub pagination: Option<Pagination>,
}

impl PersonListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            stage: None,
            source: None,
            assigned_user_id: None,
            pond_id: None,
            unassigned: false,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn stage(mut self, stage: impl Into<String>) -> Self {
        self.stage = Some(stage.into());
        self
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn assigned_to(mut self, user_id: UserId) -> Self {
        self.assigned_user_id = Some(user_id);
        self
    }

    pub fn pond(mut self, pond_id: PondId) -> Self {
        self.pond_id = Some(pond_id);
        self
    }

    pub fn unassigned(mut self) -> Self {
        self.unassigned = true;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

#[derive(Debug, Clone)]
pub struct DealListQuery {
    pub hub_id: HubId,
    pub search: Option<String>,
    pub stage_id: Option<DealStageId>,
    pub type_id: Option<DealTypeId>,
    pub user_id: Option<UserId>,
    pub person_id: Option<PersonId>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub pagination: Option<Pagination>,
}

impl DealListQuery {
    pub fn new(hub_id: HubId) -> Self {
        Self {
            hub_id,
            search: None,
            stage_id: None,
            type_id: None,
            user_id: None,
            person_id: None,
            min_price: None,
            max_price: None,
            pagination: None,
        }
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn stage(mut self, stage_id: DealStageId) -> Self {
        self.stage_id = Some(stage_id);
        self
    }

    pub fn deal_type(mut self, type_id: DealTypeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn user(mut self, user_id: UserId) -> Self {
        self.user_id = Some(user_id);
        self
    }

    pub fn person(mut self, person_id: PersonId) -> Self {
        self.person_id = Some(person_id);
        self
    }

    pub fn price_range(mut self, min: Option<i64>, max: Option<i64>) -> Self {
        self.min_price = min;
        self.max_price = max;
        self
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

/// Activities of one person, newest first.
#[derive(Debug, Clone)]
pub struct ActivityListQuery {
    pub hub_id: HubId,
    pub person_id: PersonId,
    pub pagination: Option<Pagination>,
}

impl ActivityListQuery {
    pub fn new(hub_id: HubId, person_id: PersonId) -> Self {
        Self {
            hub_id,
            person_id,
            pagination: None,
        }
    }

    pub fn paginate(mut self, page: usize, per_page: usize) -> Self {
        self.pagination = Some(Pagination { page, per_page });
        self
    }
}

pub trait UserReader {
    fn get_user_by_id(&self, id: UserId, hub_id: HubId) -> RepositoryResult<Option<User>>;
    fn get_user_by_email(&self, email: &UserEmail, hub_id: HubId)
    -> RepositoryResult<Option<User>>;
    fn list_users(&self, hub_id: HubId) -> RepositoryResult<Vec<User>>;
}

pub trait UserWriter {
    fn create_or_update_user(&self, new_user: &NewUser) -> RepositoryResult<User>;
}

pub trait PersonReader {
    fn get_person_by_id(&self, id: PersonId, hub_id: HubId) -> RepositoryResult<Option<Person>>;
    fn list_people(&self, query: PersonListQuery) -> RepositoryResult<(usize, Vec<Person>)>;
}

pub trait PersonWriter {
    fn create_person(&self, new_person: &NewPerson) -> RepositoryResult<Person>;
    fn create_people(&self, new_people: &[NewPerson]) -> RepositoryResult<usize>;
    /// Inserts a routed lead. When `team_id` is given and the assignment has
    /// no agent, the least-loaded team member is chosen in the same
    /// transaction.
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

pub trait LeadFlowRuleReader {
    /// Rules of the hub ordered by default flag, sort and id.
    fn list_lead_flow_rules(&self, hub_id: HubId) -> RepositoryResult<Vec<LeadFlowRule>>;
    fn get_lead_flow_rule_by_id(
        &self,
        id: LeadFlowRuleId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<LeadFlowRule>>;
}

pub trait LeadFlowRuleWriter {
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

pub trait DealReader {
    fn get_deal_by_id(
        &self,
        id: DealId,
        hub_id: HubId,
    ) -> RepositoryResult<Option<DealWithRelations>>;
    fn list_deals(&self, query: DealListQuery) -> RepositoryResult<(usize, Vec<Deal>)>;
}

pub trait DealWriter {
    fn create_deal(&self, new_deal: &NewDeal) -> RepositoryResult<Deal>;
    fn update_deal(&self, id: DealId, hub_id: HubId, updates: &UpdateDeal)
    -> RepositoryResult<Deal>;
    fn delete_deal(&self, id: DealId, hub_id: HubId) -> RepositoryResult<()>;
    fn delete_deals(
        &self,
        hub_id: HubId,
        selection: &BulkSelection<DealId>,
    ) -> RepositoryResult<usize>;
}

pub trait DealCategoryReader {
    fn list_deal_stages(&self, hub_id: HubId) -> RepositoryResult<Vec<DealStage>>;
    fn get_deal_stage(&self, id: DealStageId, hub_id: HubId)
    -> RepositoryResult<Option<DealStage>>;
    fn list_deal_types(&self, hub_id: HubId) -> RepositoryResult<Vec<DealType>>;
    fn get_deal_type(&self, id: DealTypeId, hub_id: HubId) -> RepositoryResult<Option<DealType>>;
}

pub trait DealCategoryWriter {
    fn create_deal_stage(&self, hub_id: HubId, name: &CategoryName)
    -> RepositoryResult<DealStage>;
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

pub trait ActivityReader {
    fn list_calls(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Call>)>;
    fn list_emails(&self, query: ActivityListQuery) -> RepositoryResult<(usize, Vec<Email>)>;
    fn list_appointments(
        &self,
        query: ActivityListQuery,
    ) -> RepositoryResult<(usize, Vec<Appointment>)>;
}

pub trait ActivityWriter {
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

pub trait GroupReader {
    fn list_ponds(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Pond>>>;
    fn get_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Pond>>>;
    fn list_teams(&self, hub_id: HubId) -> RepositoryResult<Vec<WithMembers<Team>>>;
    fn get_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<Option<WithMembers<Team>>>;
}

pub trait GroupWriter {
    fn create_pond(&self, input: &GroupInput) -> RepositoryResult<Pond>;
    fn update_pond(&self, id: PondId, input: &GroupInput) -> RepositoryResult<Pond>;
    fn delete_pond(&self, id: PondId, hub_id: HubId) -> RepositoryResult<()>;
    fn create_team(&self, input: &GroupInput) -> RepositoryResult<Team>;
    fn update_team(&self, id: TeamId, input: &GroupInput) -> RepositoryResult<Team>;
    fn delete_team(&self, id: TeamId, hub_id: HubId) -> RepositoryResult<()>;
}

pub trait ReportReader {
    /// Per-user activity counts in the half-open window `[from, to)`.
    fn activity_report(
        &self,
        hub_id: HubId,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> RepositoryResult<Vec<ActivityReportRow>>;
    fn pipeline_report(&self, hub_id: HubId) -> RepositoryResult<Vec<PipelineReportRow>>;
}
