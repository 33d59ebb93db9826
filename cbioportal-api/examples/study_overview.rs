use cbioportal_api::{CbioPortalClient, PortalConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let study_id = std::env::args().nth(1).unwrap_or_else(|| "acc_tcga".to_string());
    let client = CbioPortalClient::with_config(
        PortalConfig::new().with_user_agent("study-overview/1.0"),
    )?;

    println!("Fetching {study_id} from {}...", client.base_url());

    match client.study(&study_id).await {
        Ok(study) => {
            println!("Name: {}", study.name.as_deref().unwrap_or("N/A"));
            println!("Samples: {:?}", study.all_sample_count);

            let profiles = client.molecular_profiles(&study_id).await?;
            println!("Molecular profiles: {}", profiles.len());
            for profile in &profiles {
                println!(
                    "  {} [{}]",
                    profile.molecular_profile_id,
                    profile.datatype.as_deref().unwrap_or("?")
                );
            }

            if let Some(lists) = client.sample_lists(&study_id).await.ok()
                && let Some(first) = lists.first()
            {
                println!("First sample list: {}", first.sample_list_id);
            }
        }
        Err(e) => {
            println!("Error: {}", e);
        }
    }

    Ok(())
}
