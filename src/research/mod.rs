//! Company research pipeline
//!
//! [`Researcher::analyze`] runs every step in order, awaiting each one before
//! the next. A collaborator failure never aborts the analysis: it is logged,
//! recorded as an [`AnalysisWarning`] and the step yields empty data.
//!
//! ```text
//! wikipedia -> summary -> ceo -> description -> classification
//!   -> event search -> extraction -> enrichment -> management
//!   -> subsidiaries -> company database + gap analysis -> report store
//! ```

pub mod classify;
pub mod linkedin;
pub mod queries;
pub mod report;

use chrono::{Datelike, Utc};
use std::fmt;
use std::sync::Arc;

use crate::companydb::{
    db_management, db_overview, CompanyDatabase, CompanyDbClient, CreateEventOutcome, NewEventRequest,
};
use crate::config::Config;
use crate::enrich::Enricher;
use crate::fetcher::{format_plain, format_snippets, BatchResults, Encyclopedia, SearchBatch, SearchProvider};
use crate::fetcher::{SerpApiClient, WikipediaClient};
use crate::llm::{prompts, ChatModel, LlmClient, LlmTask, ModelRouter};
use crate::matching::EventMatcher;
use crate::models::{dedup_management, AnalysisWarning, CorporateEvent, ManagementEntry, Subsidiary};
use crate::parser::{ceo_from_text, clean_ceo_reply, parse_events, parse_management, parse_subsidiaries};
use crate::parser::{replace_ceo_line, CompanyDetails};
use crate::profile::{ai_overview, company_name_from_query};
use crate::storage::{NewReport, ReportRepository, SqliteReportRepository};
use crate::utils::error::FetchError;
use crate::utils::is_url;

pub use classify::{classify_snippets, CompanyKind, CompanyProfile, EstimatedSize};
pub use queries::{event_plan, EventQueryPlan};
pub use report::{AnalysisReport, RefreshReport};

/// Wikipedia text shorter than this is supplemented by web search
const MIN_BACKGROUND_CHARS: usize = 100;

/// Descriptions shorter than this are rejected
const MIN_DESCRIPTION_CHARS: usize = 40;

const MAX_DESCRIPTION_LINES: usize = 6;
const SUMMARY_RESULTS: u32 = 5;
const CEO_RESULTS: u32 = 10;
const CLASSIFY_RESULTS: u32 = 5;
const MANAGEMENT_RESULTS: u32 = 10;
const SUBSIDIARY_RESULTS: u32 = 30;
const SUBSIDIARY_LINKS: usize = 20;

fn record(warnings: &mut Vec<AnalysisWarning>, stage: &str, error: impl fmt::Display) {
    tracing::warn!(stage = %stage, error = %error, "Analysis step degraded");
    warnings.push(AnalysisWarning::new(stage, error));
}

fn record_failures(warnings: &mut Vec<AnalysisWarning>, stage: &str, results: &BatchResults) {
    if let Some(first) = results.failures.first() {
        record(
            warnings,
            stage,
            format!(
                "{} search quer{} failed, first: {}",
                results.failures.len(),
                if results.failures.len() == 1 { "y" } else { "ies" },
                first.error
            ),
        );
    }
}

/// Keep the first lines of a description; `None` when too short
pub fn clean_description(reply: &str) -> Option<String> {
    let text = reply
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .take(MAX_DESCRIPTION_LINES)
        .collect::<Vec<_>>()
        .join("\n");
    (text.chars().count() >= MIN_DESCRIPTION_CHARS).then_some(text)
}

/// Orchestrates one analysis over the four collaborators
pub struct Researcher {
    config: Arc<Config>,
    search: Arc<dyn SearchProvider>,
    wiki: Arc<dyn Encyclopedia>,
    router: ModelRouter,
    db: Arc<dyn CompanyDatabase>,
    repo: Option<Arc<dyn ReportRepository>>,
}

impl Researcher {
    pub fn new(
        config: Arc<Config>,
        search: Arc<dyn SearchProvider>,
        wiki: Arc<dyn Encyclopedia>,
        chat: Arc<dyn ChatModel>,
        db: Arc<dyn CompanyDatabase>,
    ) -> Self {
        let router = ModelRouter::new(chat, config.llm.clone());
        Self {
            config,
            search,
            wiki,
            router,
            db,
            repo: None,
        }
    }

    /// Attach a report store
    #[must_use]
    pub fn with_repository(mut self, repo: Arc<dyn ReportRepository>) -> Self {
        self.repo = Some(repo);
        self
    }

    /// Build the production collaborators from configuration
    ///
    /// # Errors
    ///
    /// Fails when an HTTP client cannot be built or the report store cannot
    /// be opened
    pub fn from_config(config: Arc<Config>) -> anyhow::Result<Self> {
        let researcher = Self::new(
            Arc::clone(&config),
            Arc::new(SerpApiClient::with_config(&config.search)?),
            Arc::new(WikipediaClient::with_config(&config.wikipedia)?),
            Arc::new(LlmClient::with_config(&config.llm)?),
            Arc::new(CompanyDbClient::with_config(&config.company_db)?),
        );

        if !config.research.store_reports {
            return Ok(researcher);
        }
        let repo = SqliteReportRepository::new(&config.storage.sqlite_path)?;
        Ok(researcher.with_repository(Arc::new(repo)))
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn repository(&self) -> Option<&Arc<dyn ReportRepository>> {
        self.repo.as_ref()
    }

    /// Run the full analysis for a company name or URL
    pub async fn analyze(&self, query: &str) -> AnalysisReport {
        let query = query.trim();
        let company = company_name_from_query(query);
        let website = is_url(query).then_some(query);
        let batch = SearchBatch::new(self.search.as_ref(), self.config.query_interval());
        let mut report = AnalysisReport::new(query, &company);

        tracing::info!(analysis_id = %report.id, query = %query, company = %company, "Analysis started");

        let background = self.background(&company, &mut report.warnings).await;

        let summary = self
            .summary(&batch, &company, website, &background, &mut report.warnings)
            .await;
        report.ceo = self.ceo(&batch, &company, &mut report.warnings).await;
        report.summary = if summary.is_empty() {
            summary
        } else {
            replace_ceo_line(&summary, report.ceo.as_deref())
        };

        report.description = self
            .description(&company, &report.summary, &background, &mut report.warnings)
            .await
            .unwrap_or_default();

        let details = CompanyDetails::parse(&report.summary);
        report.ai_overview = ai_overview(query, &details, Some(report.description.as_str()));
        if report.ai_overview.ceo.is_none() {
            report.ai_overview.ceo = report.ceo.clone();
        }

        let max_events = self.config.research.max_events;
        if max_events > 1 {
            report.company_profile = self.classify(&batch, &company, &mut report.warnings).await;
        }
        let plan = event_plan(&company, max_events, report.company_profile.kind, Utc::now().year());
        report.events = self.events(&batch, &company, &plan, &mut report.warnings).await;

        if self.config.research.enrich_events && !report.events.is_empty() {
            let warnings = Enricher::new(&self.router).enrich(&mut report.events).await;
            report.warnings.extend(warnings);
        }

        report.management = self
            .management(&batch, &company, &background, &mut report.warnings)
            .await;
        report.subsidiaries = self.subsidiaries(&batch, &company, &mut report.warnings).await;

        let db_url = website
            .map(str::to_string)
            .or_else(|| report.ai_overview.website.clone());
        self.compare_with_database(db_url.as_deref(), &mut report).await;

        if let Some(warning) = self.store(&report) {
            report.warnings.push(warning);
        }

        tracing::info!(
            analysis_id = %report.id,
            company = %company,
            events = report.events.len(),
            missing = report.missing.len(),
            management = report.management.len(),
            subsidiaries = report.subsidiaries.len(),
            warnings = report.warnings.len(),
            "Analysis complete"
        );
        report
    }

    /// Database-only view of a company, no model calls
    pub async fn refresh(&self, url: &str) -> RefreshReport {
        let mut report = RefreshReport {
            url: url.trim().to_string(),
            ..Default::default()
        };

        match self.db.lookup_by_url(&report.url).await {
            Ok(Some(found)) => {
                let id = found.id;
                report.existing_company = Some(found);
                let fallback = company_name_from_query(url);
                match self.db.company(id).await {
                    Ok(company_record) => {
                        report.db_overview = db_overview(&company_record, &fallback);
                        report.db_management = db_management(&company_record);
                    }
                    Err(e) => record(&mut report.warnings, "company_db", e),
                }
                match self.db.events(id).await {
                    Ok(events) => report.db_events = events,
                    Err(e) => record(&mut report.warnings, "company_db", e),
                }
            }
            Ok(None) => tracing::info!(url = %report.url, "Company not in database"),
            Err(e) => record(&mut report.warnings, "company_db", e),
        }

        report
    }

    /// Create a missing event in the company database
    pub async fn push_event(&self, company_id: i64, event: &CorporateEvent) -> Result<CreateEventOutcome, FetchError> {
        let request = NewEventRequest::from_event(company_id, event, &self.config.company_db.currency_ids);
        self.db.create_event(&request).await
    }

    async fn background(&self, company: &str, warnings: &mut Vec<AnalysisWarning>) -> String {
        match self.wiki.summary(company).await {
            Ok(Some(text)) => text,
            Ok(None) => String::new(),
            Err(e) => {
                record(warnings, "wikipedia", e);
                String::new()
            }
        }
    }

    async fn summary(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        website: Option<&str>,
        background: &str,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> String {
        let mut context = background.to_string();
        if context.chars().count() < MIN_BACKGROUND_CHARS {
            let results = batch.run(&queries::summary_queries(company, website), SUMMARY_RESULTS).await;
            record_failures(warnings, "summary_search", &results);
            if !results.is_empty() {
                context = format_plain(&results.hits);
            }
        }

        match self
            .router
            .ask(LlmTask::Summary, &prompts::summary(company, website, &context))
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                record(warnings, "summary", e);
                String::new()
            }
        }
    }

    /// Strict CEO extraction from search text, regex cascade as fallback
    async fn ceo(&self, batch: &SearchBatch<'_>, company: &str, warnings: &mut Vec<AnalysisWarning>) -> Option<String> {
        let results = batch.run(&queries::ceo_queries(company), CEO_RESULTS).await;
        record_failures(warnings, "ceo_search", &results);
        if results.is_empty() {
            return None;
        }

        let text = format_plain(&results.hits);
        let from_model = match self.router.ask(LlmTask::Ceo, &prompts::ceo(company, &text)).await {
            Ok(reply) => clean_ceo_reply(&reply),
            Err(e) => {
                record(warnings, "ceo", e);
                None
            }
        };

        let ceo = from_model.or_else(|| ceo_from_text(&text));
        tracing::info!(company = %company, ceo = ?ceo, "CEO extraction");
        ceo
    }

    async fn description(
        &self,
        company: &str,
        summary: &str,
        background: &str,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Option<String> {
        let prompt = prompts::description(company, summary, background);
        match self.router.ask(LlmTask::Description, &prompt).await {
            Ok(reply) => {
                let description = clean_description(&reply);
                if description.is_none() {
                    record(warnings, "description", "description too short, discarded");
                }
                description
            }
            Err(e) => {
                record(warnings, "description", e);
                None
            }
        }
    }

    /// Keyword classification, asking the model only when the keywords tie
    async fn classify(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> CompanyProfile {
        let results = batch
            .run(&queries::classification_queries(company), CLASSIFY_RESULTS)
            .await;
        record_failures(warnings, "classification_search", &results);

        let text = results
            .hits
            .iter()
            .map(|hit| format!("{} {}", hit.title, hit.snippet))
            .collect::<Vec<_>>()
            .join(" ");
        let mut profile = classify_snippets(&text);

        if profile.ambiguous && !text.trim().is_empty() {
            let prompt = prompts::classify_company(company, &text);
            match self.router.ask(LlmTask::ClassifyCompany, &prompt).await {
                Ok(reply) => {
                    if let Some(kind) = classify::kind_from_reply(&reply) {
                        profile.kind = kind;
                        profile.ambiguous = false;
                    }
                }
                Err(e) => record(warnings, "classification", e),
            }
        }

        tracing::info!(
            company = %company,
            kind = profile.kind.as_str(),
            startup_score = profile.startup_score,
            enterprise_score = profile.enterprise_score,
            founded = ?profile.founded_year,
            "Company classified"
        );
        profile
    }

    async fn events(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        plan: &EventQueryPlan,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Vec<CorporateEvent> {
        tracing::info!(
            company = %company,
            queries = plan.queries.len(),
            testing = plan.testing,
            startup = plan.startup,
            "Running event search plan"
        );
        let results = batch.run(&plan.queries, plan.num).await;
        record_failures(warnings, "event_search", &results);
        if results.is_empty() {
            tracing::info!(company = %company, "No event search results");
            return Vec::new();
        }

        let max_events = self.config.research.max_events;
        let prompt = prompts::events(
            company,
            &format_snippets(&results.hits),
            results.hits.len(),
            max_events,
            plan.startup,
        );

        match self.router.ask(LlmTask::Events, &prompt).await {
            Ok(reply) => {
                let events = parse_events(&reply, max_events);
                tracing::info!(company = %company, events = events.len(), "Events extracted");
                events
            }
            Err(e) => {
                record(warnings, "events", e);
                Vec::new()
            }
        }
    }

    async fn management(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        background: &str,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Vec<ManagementEntry> {
        let results = batch
            .run(&queries::management_queries(company), MANAGEMENT_RESULTS)
            .await;
        record_failures(warnings, "management_search", &results);

        let snippets = results
            .hits
            .iter()
            .map(|hit| hit.snippet.as_str())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        let context = format!("{background}\n\n{snippets}");

        let mut entries = match self
            .router
            .ask(LlmTask::Management, &prompts::management(company, &context))
            .await
        {
            Ok(reply) => parse_management(&reply),
            Err(e) => {
                record(warnings, "management", e);
                Vec::new()
            }
        };

        if entries.is_empty() {
            let prompt = prompts::management_fallback(company, &context);
            match self.router.ask(LlmTask::ManagementFallback, &prompt).await {
                Ok(reply) => entries = parse_management(&reply),
                Err(e) => record(warnings, "management", e),
            }
        }

        if self.config.research.linkedin_lookup {
            self.attach_linkedin(batch, company, &mut entries, warnings).await;
        }

        dedup_management(entries)
    }

    async fn attach_linkedin(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        entries: &mut [ManagementEntry],
        warnings: &mut Vec<AnalysisWarning>,
    ) {
        for entry in entries.iter_mut().filter(|e| e.linkedin_url.is_none()) {
            match linkedin::find_profile(batch, &entry.name, company).await {
                Ok(link) => entry.linkedin_url = link,
                Err(e @ FetchError::NotConfigured(_)) => {
                    record(warnings, "linkedin", e);
                    return;
                }
                Err(e) => record(warnings, "linkedin", format!("{}: {e}", entry.name)),
            }
        }
    }

    /// Cached subsidiaries, else Wikipedia names plus search links through the model
    async fn subsidiaries(
        &self,
        batch: &SearchBatch<'_>,
        company: &str,
        warnings: &mut Vec<AnalysisWarning>,
    ) -> Vec<Subsidiary> {
        if let Some(repo) = &self.repo {
            match repo.subsidiaries(company) {
                Ok(Some(cached)) if !cached.is_empty() => {
                    tracing::info!(company = %company, count = cached.len(), "Subsidiaries from cache");
                    return cached;
                }
                Ok(_) => {}
                Err(e) => record(warnings, "storage", e),
            }
        }

        let wiki_names = match self.wiki.subsidiaries(company).await {
            Ok(names) => names,
            Err(e) => {
                record(warnings, "wikipedia", e);
                Vec::new()
            }
        };

        let results = batch.run(&[queries::subsidiary_query(company)], SUBSIDIARY_RESULTS).await;
        record_failures(warnings, "subsidiary_search", &results);
        let links: Vec<String> = results
            .hits
            .iter()
            .filter(|hit| !hit.link.is_empty())
            .take(SUBSIDIARY_LINKS)
            .map(|hit| hit.link.clone())
            .collect();

        let prompt = prompts::subsidiaries(company, &wiki_names, &links);
        let subsidiaries = match self.router.ask(LlmTask::Subsidiaries, &prompt).await {
            Ok(reply) => parse_subsidiaries(&reply),
            Err(e) => {
                record(warnings, "subsidiaries", e);
                return Vec::new();
            }
        };

        if let Some(repo) = self.repo.as_ref().filter(|_| !subsidiaries.is_empty()) {
            if let Err(e) = repo.store_subsidiaries(company, &subsidiaries) {
                record(warnings, "storage", e);
            }
        }
        subsidiaries
    }

    /// Look the company up and split AI events into matched and missing
    ///
    /// Without a database match every AI event is missing.
    async fn compare_with_database(&self, url: Option<&str>, report: &mut AnalysisReport) {
        let matcher = EventMatcher::new(self.config.matching.threshold);

        let found = match url {
            Some(url) => match self.db.lookup_by_url(url).await {
                Ok(found) => found,
                Err(e) => {
                    record(&mut report.warnings, "company_db", e);
                    None
                }
            },
            None => {
                tracing::debug!(company = %report.company_name, "No website to look up");
                None
            }
        };

        if let Some(found) = &found {
            match self.db.company(found.id).await {
                Ok(company_record) => {
                    report.db_overview = db_overview(&company_record, &report.company_name);
                    report.db_management = db_management(&company_record);
                }
                Err(e) => record(&mut report.warnings, "company_db", e),
            }
            match self.db.events(found.id).await {
                Ok(events) => report.db_events = events,
                Err(e) => record(&mut report.warnings, "company_db", e),
            }
        }

        let gap = matcher.analyze(&report.events, &report.db_events);
        report.matched = gap.matched;
        report.missing = gap.missing;
        report.existing_company = found;
    }

    fn store(&self, report: &AnalysisReport) -> Option<AnalysisWarning> {
        let repo = self.repo.as_ref().filter(|_| self.config.research.store_reports)?;

        let stored = repo.store_report(&NewReport {
            company: &report.company_name,
            summary: &report.summary,
            description: &report.description,
            events: &report.events,
            management: &report.management,
        });

        let error = stored.err()?;
        tracing::warn!(error = %error, "Report not stored");
        Some(AnalysisWarning::new("storage", format!("{error:#}")))
    }
}
