use std::collections::HashMap;

use cbioportal_api::CbioPortalClient;
use cbioportal_api::models::{
    ClinicalData, MolecularAlterationType, MolecularDataFilter, MolecularProfile,
    PatientIdentifier, StudyViewFilter, SurvivalRequest, TreatmentLevel,
};

use super::ToolError;
use super::args::{
    ClinicalDataArgs, CopyNumberArgs, GenePanelsArgs, MolecularDataArgs, MutationsArgs,
    PagedStudyArgs, SearchGenesArgs, StudiesArgs, SurvivalArgs, ToolArgs, TreatmentArgs,
};
use crate::format::{
    BULLET, alteration_label, capped_list, count_or_na, display_or_na, join_list, or_na,
};

type HandlerResult = Result<String, ToolError>;

const MOLECULAR_CAP: usize = 50;
const SUMMARY_CAP: usize = 20;
const CLINICAL_VALUES_PER_ATTRIBUTE: usize = 10;
const CLINICAL_DATA_PAGE_SIZE: u32 = 100;
const GENE_PANEL_PAGE_SIZE: u32 = 100;

pub(super) async fn execute(portal: &CbioPortalClient, args: &ToolArgs) -> HandlerResult {
    match args {
        ToolArgs::Studies(args) => studies(portal, args).await,
        ToolArgs::StudyDetails(args) => study_details(portal, &args.study_id).await,
        ToolArgs::Samples(args) => samples(portal, args).await,
        ToolArgs::Patients(args) => patients(portal, args).await,
        ToolArgs::SampleLists(args) => sample_lists(portal, &args.study_id).await,
        ToolArgs::MolecularProfiles(args) => molecular_profiles(portal, &args.study_id).await,
        ToolArgs::Mutations(args) => mutations(portal, args).await,
        ToolArgs::CopyNumberAlterations(args) => copy_number_alterations(portal, args).await,
        ToolArgs::MolecularData(args) => molecular_data(portal, args).await,
        ToolArgs::ClinicalData(args) => clinical_data(portal, args).await,
        ToolArgs::ClinicalAttributes(args) => clinical_attributes(portal, &args.study_id).await,
        ToolArgs::SearchGenes(args) => search_genes(portal, args).await,
        ToolArgs::GenePanels(args) => gene_panels(portal, args).await,
        ToolArgs::CancerTypes => cancer_types(portal).await,
        ToolArgs::SignificantlyMutatedGenes(args) => {
            significantly_mutated_genes(portal, &args.study_id).await
        }
        ToolArgs::SurvivalData(args) => survival_data(portal, args).await,
        ToolArgs::TreatmentData(args) => treatment_data(portal, args).await,
    }
}

// === Studies, samples and patients ===

async fn studies(portal: &CbioPortalClient, args: &StudiesArgs) -> HandlerResult {
    let studies = portal
        .list_studies(args.keyword.as_deref(), args.page_size)
        .await?;
    let shown = &studies[..studies.len().min(args.page_size as usize)];

    let entries = join_list(shown, "\n\n", |study| {
        format!(
            "{BULLET} **{}** ({})\n  {}\n  Samples: {} ({} sequenced)",
            or_na(study.name.as_deref()),
            study.study_id,
            or_na(study.description.as_deref()),
            display_or_na(study.all_sample_count),
            display_or_na(study.sequenced_sample_count),
        )
    });
    Ok(format!("Found {} studies:\n\n{entries}", studies.len()))
}

async fn study_details(portal: &CbioPortalClient, study_id: &str) -> HandlerResult {
    let study = portal.study(study_id).await?;
    let public = match study.public_study {
        Some(true) => "Yes",
        _ => "No",
    };

    Ok(format!(
        "## Study Details: {name}\n\n\
         **Study ID:** {id}\n\
         **Cancer Type:** {cancer_type}\n\
         **Description:** {description}\n\
         **Public Study:** {public}\n\n\
         **Sample Counts:**\n\
         - Total Samples: {total}\n\
         - Sequenced Samples: {sequenced}\n\
         - CNA Samples: {cna}\n\
         - RNA-seq Samples: {rna}\n\n\
         **Citation:** {citation}\n\
         **PMID:** {pmid}",
        name = or_na(study.name.as_deref()),
        id = study.study_id,
        cancer_type = or_na(study.cancer_type_id.as_deref()),
        description = or_na(study.description.as_deref()),
        total = display_or_na(study.all_sample_count),
        sequenced = display_or_na(study.sequenced_sample_count),
        cna = count_or_na(study.cna_sample_count),
        rna = count_or_na(study.mrna_rna_seq_sample_count),
        citation = or_na(study.citation.as_deref()),
        pmid = or_na(study.pmid.as_deref()),
    ))
}

async fn samples(portal: &CbioPortalClient, args: &PagedStudyArgs) -> HandlerResult {
    let samples = portal.study_samples(&args.study_id, args.page_size).await?;
    let shown = &samples[..samples.len().min(args.page_size as usize)];

    let entries = join_list(shown, "\n", |sample| {
        format!(
            "{BULLET} {} (Patient: {}, Type: {})",
            sample.sample_id,
            or_na(sample.patient_id.as_deref()),
            or_na(sample.sample_type.as_deref()),
        )
    });
    Ok(format!(
        "Found {} samples in study {}:\n\n{entries}",
        samples.len(),
        args.study_id
    ))
}

async fn patients(portal: &CbioPortalClient, args: &PagedStudyArgs) -> HandlerResult {
    let patients = portal
        .study_patients(&args.study_id, Some(args.page_size))
        .await?;
    let shown = &patients[..patients.len().min(args.page_size as usize)];

    let entries = join_list(shown, "\n", |patient| format!("{BULLET} {}", patient.patient_id));
    Ok(format!(
        "Found {} patients in study {}:\n\n{entries}",
        patients.len(),
        args.study_id
    ))
}

async fn sample_lists(portal: &CbioPortalClient, study_id: &str) -> HandlerResult {
    let lists = portal.sample_lists(study_id).await?;

    let entries = join_list(&lists, "\n\n", |list| {
        format!(
            "{BULLET} **{}**\n  ID: {}\n  Category: {}\n  Sample Count: {}\n  Description: {}",
            or_na(list.name.as_deref()),
            list.sample_list_id,
            or_na(list.category.as_deref()),
            display_or_na(list.sample_count),
            or_na(list.description.as_deref()),
        )
    });
    Ok(format!("Sample lists for study {study_id}:\n\n{entries}"))
}

// === Molecular data ===

async fn molecular_profiles(portal: &CbioPortalClient, study_id: &str) -> HandlerResult {
    let profiles = portal.molecular_profiles(study_id).await?;

    let entries = join_list(&profiles, "\n\n", |profile| {
        format!(
            "{BULLET} **{}**\n  ID: {}\n  Type: {}\n  Datatype: {}\n  Description: {}",
            or_na(profile.name.as_deref()),
            profile.molecular_profile_id,
            or_na(profile.molecular_alteration_type.as_deref()),
            or_na(profile.datatype.as_deref()),
            or_na(profile.description.as_deref()),
        )
    });
    Ok(format!("Molecular profiles for study {study_id}:\n\n{entries}"))
}

/// First profile of the study with the given alteration type
async fn require_profile(
    portal: &CbioPortalClient,
    study_id: &str,
    kind: MolecularAlterationType,
    label: &str,
) -> Result<MolecularProfile, ToolError> {
    portal
        .molecular_profiles(study_id)
        .await?
        .into_iter()
        .find(|profile| profile.is_alteration(kind))
        .ok_or_else(|| {
            ToolError::MissingData(format!("No {label} data available for study {study_id}"))
        })
}

/// Entrez ids for the requested symbols, plus an id → symbol lookup
struct ResolvedGenes {
    entrez_ids: Vec<i64>,
    symbols: HashMap<i64, String>,
}

impl ResolvedGenes {
    /// Symbol carried by the record, else the one we resolved, else `Unknown`
    fn symbol<'a>(&'a self, own: Option<&'a str>, entrez_id: Option<i64>) -> &'a str {
        own.or_else(|| entrez_id.and_then(|id| self.symbols.get(&id).map(String::as_str)))
            .unwrap_or("Unknown")
    }
}

async fn resolve_genes(
    portal: &CbioPortalClient,
    symbols: &[String],
) -> Result<ResolvedGenes, ToolError> {
    let genes = portal.fetch_genes_by_symbol(symbols).await?;
    let entrez_ids = genes.iter().map(|gene| gene.entrez_gene_id).collect();
    let symbols = genes
        .into_iter()
        .map(|gene| (gene.entrez_gene_id, gene.hugo_gene_symbol))
        .collect();
    Ok(ResolvedGenes { entrez_ids, symbols })
}

async fn mutations(portal: &CbioPortalClient, args: &MutationsArgs) -> HandlerResult {
    let profile = require_profile(
        portal,
        &args.study_id,
        MolecularAlterationType::MutationExtended,
        "mutation",
    )
    .await?;
    let genes = resolve_genes(portal, &args.gene_symbols).await?;

    let filter = MolecularDataFilter::for_study(
        &args.study_id,
        genes.entrez_ids.clone(),
        args.sample_ids.clone(),
    );
    let mutations = portal
        .fetch_mutations(&profile.molecular_profile_id, &filter)
        .await?;

    let entries = capped_list(&mutations, MOLECULAR_CAP, "\n\n", "mutations", |mutation| {
        format!(
            "{BULLET} **{}** in {} ({})\n  Type: {}\n  Change: {}",
            genes.symbol(mutation.gene_symbol(), mutation.entrez_gene_id),
            or_na(mutation.sample_id.as_deref()),
            or_na(mutation.patient_id.as_deref()),
            or_na(mutation.mutation_type.as_deref()),
            or_na(mutation.change()),
        )
    });
    Ok(format!(
        "Found {} mutations in {} for study {}:\n\n{entries}",
        mutations.len(),
        args.gene_symbols.join(", "),
        args.study_id
    ))
}

async fn copy_number_alterations(
    portal: &CbioPortalClient,
    args: &CopyNumberArgs,
) -> HandlerResult {
    let profile = require_profile(
        portal,
        &args.study_id,
        MolecularAlterationType::CopyNumberAlteration,
        "copy number alteration",
    )
    .await?;
    let genes = resolve_genes(portal, &args.gene_symbols).await?;

    let filter = MolecularDataFilter::for_study(&args.study_id, genes.entrez_ids.clone(), None);
    let alterations = portal
        .fetch_discrete_copy_number(&profile.molecular_profile_id, args.alteration_type, &filter)
        .await?;

    let entries = capped_list(&alterations, MOLECULAR_CAP, "\n\n", "alterations", |cna| {
        format!(
            "{BULLET} **{}** in {} ({})\n  Alteration: {}",
            genes.symbol(cna.gene_symbol(), cna.entrez_gene_id),
            or_na(cna.sample_id.as_deref()),
            or_na(cna.patient_id.as_deref()),
            alteration_label(cna.alteration),
        )
    });
    Ok(format!(
        "Found {} copy number alterations in {} for study {}:\n\n{entries}",
        alterations.len(),
        args.gene_symbols.join(", "),
        args.study_id
    ))
}

/// Pick the profile for a free-text type keyword.
///
/// Matching is case-insensitive and keeps upstream order: the first profile
/// whose datatype contains the keyword wins, then the first whose id
/// contains it. Without a keyword, or with no match, the first profile is
/// used. `None` only when the study has no profiles at all.
pub(super) fn select_profile<'a>(
    profiles: &'a [MolecularProfile],
    keyword: Option<&str>,
) -> Option<&'a MolecularProfile> {
    let keyword = keyword
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_lowercase);

    if let Some(keyword) = keyword {
        let by_datatype = profiles.iter().find(|profile| {
            profile
                .datatype
                .as_deref()
                .is_some_and(|datatype| datatype.to_lowercase().contains(&keyword))
        });
        let matched = by_datatype.or_else(|| {
            profiles
                .iter()
                .find(|profile| profile.molecular_profile_id.to_lowercase().contains(&keyword))
        });
        if matched.is_some() {
            return matched;
        }
        tracing::debug!(%keyword, "no profile matched, using the first one");
    }
    profiles.first()
}

async fn molecular_data(portal: &CbioPortalClient, args: &MolecularDataArgs) -> HandlerResult {
    let profiles = portal.molecular_profiles(&args.study_id).await?;
    let profile = select_profile(&profiles, args.molecular_profile_type.as_deref()).ok_or_else(|| {
        ToolError::MissingData(format!(
            "No molecular profiles available for study {}",
            args.study_id
        ))
    })?;
    let genes = resolve_genes(portal, &args.gene_symbols).await?;

    let filter = MolecularDataFilter::for_study(&args.study_id, genes.entrez_ids.clone(), None);
    let data = portal
        .fetch_molecular_data(&profile.molecular_profile_id, &filter)
        .await?;

    let entries = capped_list(&data, MOLECULAR_CAP, "\n\n", "data points", |item| {
        format!(
            "{BULLET} **{}** in {} ({})\n  Value: {}",
            genes.symbol(item.gene_symbol(), item.entrez_gene_id),
            or_na(item.sample_id.as_deref()),
            or_na(item.patient_id.as_deref()),
            item.display_value(),
        )
    });
    Ok(format!(
        "Molecular data for {} in study {} ({}):\n\n{entries}",
        args.gene_symbols.join(", "),
        args.study_id,
        profile
            .name
            .as_deref()
            .unwrap_or(&profile.molecular_profile_id),
    ))
}

async fn significantly_mutated_genes(portal: &CbioPortalClient, study_id: &str) -> HandlerResult {
    let results = portal.significantly_mutated_genes(study_id).await?;

    let entries = capped_list(&results, SUMMARY_CAP, "\n\n", "genes", |row| {
        format!(
            "{BULLET} **{}** (Rank: {})\n  p-value: {}\n  q-value: {}\n  Mutations: {}",
            or_na(row.hugo_gene_symbol.as_deref()),
            display_or_na(row.rank),
            display_or_na(row.p_value),
            display_or_na(row.q_value),
            display_or_na(row.num_mutations),
        )
    });
    Ok(format!(
        "Significantly mutated genes (MutSig results) for study {study_id}:\n\n{entries}"
    ))
}

// === Clinical data ===

/// Group rows by attribute id, keeping first-seen order
fn group_by_attribute(rows: &[ClinicalData]) -> Vec<(&str, Vec<&ClinicalData>)> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<(&str, Vec<&ClinicalData>)> = Vec::new();
    for row in rows {
        let key = row.clinical_attribute_id.as_str();
        match index.get(key) {
            Some(&position) => groups[position].1.push(row),
            None => {
                index.insert(key, groups.len());
                groups.push((key, vec![row]));
            }
        }
    }
    groups
}

async fn clinical_data(portal: &CbioPortalClient, args: &ClinicalDataArgs) -> HandlerResult {
    let rows = portal
        .clinical_data(
            &args.study_id,
            args.clinical_data_type,
            args.attribute_id.as_deref(),
            CLINICAL_DATA_PAGE_SIZE,
        )
        .await?;

    let groups = group_by_attribute(&rows);
    let entries = join_list(&groups, "\n\n", |(attribute, items)| {
        let shown = &items[..items.len().min(CLINICAL_VALUES_PER_ATTRIBUTE)];
        let mut block = format!(
            "**{attribute}:**\n{}",
            join_list(shown, "\n", |item| format!(
                "  {BULLET} {}: {}",
                item.owner_id(),
                or_na(item.value.as_deref())
            ))
        );
        if items.len() > CLINICAL_VALUES_PER_ATTRIBUTE {
            block.push_str(&format!(
                "\n  ... and {} more values",
                items.len() - CLINICAL_VALUES_PER_ATTRIBUTE
            ));
        }
        block
    });
    Ok(format!(
        "Clinical data for study {} ({}):\n\n{entries}",
        args.study_id,
        args.clinical_data_type.as_str()
    ))
}

async fn clinical_attributes(portal: &CbioPortalClient, study_id: &str) -> HandlerResult {
    let attributes = portal.clinical_attributes(study_id).await?;

    let entries = join_list(&attributes, "\n\n", |attr| {
        let level = match attr.patient_attribute {
            Some(true) => "Patient",
            _ => "Sample",
        };
        format!(
            "{BULLET} **{}** ({})\n  Type: {}\n  Level: {level}\n  Description: {}",
            or_na(attr.display_name.as_deref()),
            attr.clinical_attribute_id,
            or_na(attr.datatype.as_deref()),
            or_na(attr.description.as_deref()),
        )
    });
    Ok(format!("Clinical attributes for study {study_id}:\n\n{entries}"))
}

async fn survival_data(portal: &CbioPortalClient, args: &SurvivalArgs) -> HandlerResult {
    let patients = portal.study_patients(&args.study_id, None).await?;
    let request = SurvivalRequest {
        patient_identifiers: patients
            .into_iter()
            .map(|patient| PatientIdentifier {
                patient_id: patient.patient_id,
                study_id: args.study_id.clone(),
            })
            .collect(),
        attribute_id_prefix: args.attribute_id_prefix.clone(),
    };
    let rows = portal.fetch_survival_data(&request).await?;

    let entries = capped_list(&rows, SUMMARY_CAP, "\n", "survival data", |row| {
        format!(
            "{BULLET} Patient {}: {} ({})",
            or_na(row.patient_id.as_deref()),
            or_na(row.value.as_deref()),
            row.clinical_attribute_id,
        )
    });
    Ok(format!(
        "Survival data for study {} ({}):\n\n{entries}",
        args.study_id, args.attribute_id_prefix
    ))
}

async fn treatment_data(portal: &CbioPortalClient, args: &TreatmentArgs) -> HandlerResult {
    let filter = StudyViewFilter {
        study_ids: vec![args.study_id.clone()],
    };
    let rows = portal.treatments(args.level, args.tier, &filter).await?;
    let unit = args.level.as_str().to_lowercase();

    let entries = capped_list(&rows, SUMMARY_CAP, "\n\n", "treatments", |row| {
        let mut entry = format!(
            "{BULLET} **{}**\n  Count: {} {unit}s",
            row.treatment,
            display_or_na(row.count),
        );
        if args.level == TreatmentLevel::Sample
            && let Some(time) = row.time.as_deref().filter(|t| !t.is_empty())
        {
            entry.push_str(&format!("\n  Time: {time}"));
        }
        entry
    });
    Ok(format!(
        "Treatment data for study {} ({} level, {} tier):\n\n{entries}",
        args.study_id,
        args.level.as_str(),
        args.tier.as_str()
    ))
}

// === Reference data ===

async fn search_genes(portal: &CbioPortalClient, args: &SearchGenesArgs) -> HandlerResult {
    let genes = portal.search_genes(&args.keyword, args.page_size).await?;

    let entries = join_list(&genes, "\n\n", |gene| {
        format!(
            "{BULLET} **{}** (Entrez ID: {})\n  Type: {}",
            gene.hugo_gene_symbol,
            gene.entrez_gene_id,
            or_na(gene.gene_type.as_deref()),
        )
    });
    Ok(format!(
        "Found {} genes matching \"{}\":\n\n{entries}",
        genes.len(),
        args.keyword
    ))
}

async fn gene_panels(portal: &CbioPortalClient, args: &GenePanelsArgs) -> HandlerResult {
    let panels = portal.gene_panels(GENE_PANEL_PAGE_SIZE).await?;

    let entries = capped_list(&panels, SUMMARY_CAP, "\n\n", "panels", |panel| {
        format!(
            "{BULLET} **{}**\n  Description: {}\n  Genes: {} genes",
            panel.gene_panel_id,
            or_na(panel.description.as_deref()),
            panel.gene_count(),
        )
    });
    let scope = args
        .study_id
        .as_deref()
        .map(|study_id| format!(" for study {study_id}"))
        .unwrap_or_default();
    Ok(format!("Gene panels{scope}:\n\n{entries}"))
}

async fn cancer_types(portal: &CbioPortalClient) -> HandlerResult {
    let types = portal.cancer_types().await?;

    let entries = join_list(&types, "\n\n", |cancer_type| {
        format!(
            "{BULLET} **{}** ({})\n  Short Name: {}\n  Color: {}",
            or_na(cancer_type.name.as_deref()),
            cancer_type.type_of_cancer_id,
            or_na(cancer_type.short_name.as_deref()),
            or_na(cancer_type.dedicated_color.as_deref()),
        )
    });
    Ok(format!("Cancer types available in cBioPortal:\n\n{entries}"))
}
