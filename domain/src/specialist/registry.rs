//! Read-only specialist registry

use super::config::{SpecialistConfig, SpecialistId};
use crate::core::DomainError;

/// Process-lifetime table of specialist configurations.
///
/// Built once at startup, then shared by reference into each request's
/// isolated execution context. Iteration order is insertion order, so the
/// tool declarations handed to the planner are deterministic.
#[derive(Debug, Clone)]
pub struct SpecialistRegistry {
    specialists: Vec<SpecialistConfig>,
}

impl SpecialistRegistry {
    /// Build a registry from a list of configurations.
    ///
    /// Fails if the list is empty or contains duplicate ids.
    pub fn new(specialists: Vec<SpecialistConfig>) -> Result<Self, DomainError> {
        if specialists.is_empty() {
            return Err(DomainError::EmptyRegistry);
        }
        for (i, config) in specialists.iter().enumerate() {
            if specialists[..i].iter().any(|c| c.id == config.id) {
                return Err(DomainError::DuplicateSpecialist(config.id.to_string()));
            }
        }
        Ok(Self { specialists })
    }

    /// Look up a specialist by id
    pub fn get(&self, id: &SpecialistId) -> Option<&SpecialistConfig> {
        self.specialists.iter().find(|c| &c.id == id)
    }

    /// Iterate over all specialists in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &SpecialistConfig> {
        self.specialists.iter()
    }

    pub fn len(&self) -> usize {
        self.specialists.len()
    }

    pub fn is_empty(&self) -> bool {
        self.specialists.is_empty()
    }

    /// The built-in advisory panel: individual, corporate, and partnership
    /// tax specialists. Used when no specialists are configured.
    pub fn default_panel() -> Self {
        let specialists = vec![
            SpecialistConfig::new(
                SpecialistId::new("individual"),
                "Individual Tax Expert (Dr. Sarah Chen)",
                INDIVIDUAL_PERSONA,
                "Consult Dr. Sarah Chen, the Individual Tax Expert, for questions about \
                 individual income tax, capital gains, retirement accounts, estate/gift tax, \
                 AMT, QBI, cryptocurrency, and personal tax planning.",
            ),
            SpecialistConfig::new(
                SpecialistId::new("corporate"),
                "Corporate Tax Expert (Michael Torres)",
                CORPORATE_PERSONA,
                "Consult Michael Torres, the Corporate Tax Expert, for questions about \
                 C-corporation taxation, CAMT, GILTI/BEAT/FDII, M&A structuring, NOLs and \
                 §382, international tax, R&D under §174, and executive compensation.",
            ),
            SpecialistConfig::new(
                SpecialistId::new("partnership"),
                "Partnership Tax Expert (Jennifer Walsh)",
                PARTNERSHIP_PERSONA,
                "Consult Jennifer Walsh, the Partnership Tax Expert, for questions about \
                 partnerships, LLCs, S-corporations, Subchapter K, §704(b/c) allocations, \
                 outside basis, §751 hot assets, §754 elections, and pass-through entity taxes.",
            ),
        ];

        // The built-in panel has no duplicates and is non-empty.
        Self { specialists }
    }
}

const INDIVIDUAL_PERSONA: &str = "\
You are Dr. Sarah Chen, CPA/CFP, with 18 years of Big 4 tax advisory experience specializing \
in high-net-worth individual taxation.

## YOUR DOMAIN
Individual income taxation: Form 1040 and all schedules, SALT, capital gains/losses, \
alternative minimum tax (AMT), qualified business income (QBI) deduction, estate and gift \
tax, retirement accounts, cryptocurrency, and international individual taxation.

## APPROACH
Be precise with rates, thresholds, and phaseouts for the current tax year. Flag TCJA sunset \
implications for any planning advice. Cite the governing IRC sections. When facts are \
incomplete, state the assumptions your analysis depends on.";

const CORPORATE_PERSONA: &str = "\
You are Michael Torres, JD/LLM, with 22 years of experience in corporate taxation, including \
a decade in Big 4 M&A tax practice.

## YOUR DOMAIN
C-corporation taxation: corporate rate and CAMT, GILTI/BEAT/FDII, M&A structuring (taxable \
and tax-free reorganizations), NOL limitations and §382, international tax, R&D \
capitalization under §174, and executive compensation under §162(m).

## APPROACH
Lead with the structural answer, then the quantitative impact. Distinguish book and tax \
treatment where they diverge. Cite the governing IRC sections and note open regulatory \
questions.";

const PARTNERSHIP_PERSONA: &str = "\
You are Jennifer Walsh, CPA, with 20 years of experience in pass-through entity taxation and \
Subchapter K.

## YOUR DOMAIN
Partnerships, LLCs, and S-corporations: §704(b) capital accounts and §704(c) allocations, \
outside basis and at-risk rules, §751 hot assets, §754 elections and basis adjustments, \
disguised sales, and state pass-through entity taxes (PTET).

## APPROACH
Work through the entity-level and owner-level consequences separately. Show the basis \
arithmetic when it drives the answer. Cite the governing IRC sections and regulations.";
