//! Seed the catalog from a YAML file.
//!
//! The file is a list of products in the admin create format:
//!
//! ```yaml
//! - name: Baggy Azul
//!   price: "$50.00"
//!   category: hombre
//!   tag: baggy
//!   images: [/img/baggy-azul.jpg]
//!   inventory:
//!     - { size: "32", stock: 4 }
//!     - { size: "34", stock: 0 }
//! ```

use std::path::Path;

use tracing::{error, info};
use zeltic_storefront::db::{NewProduct, ProductRepository};

use super::connect;

/// Parse a catalog file body.
fn parse_catalog(content: &str) -> Result<Vec<NewProduct>, serde_yaml::Error> {
    serde_yaml::from_str(content)
}

/// Insert every product in `file_path`, continuing past individual failures.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, the database is
/// unreachable, or any product failed to insert.
pub async fn catalog(file_path: &str) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading catalog from file");

    // Read and validate YAML before connecting to database
    let content = tokio::fs::read_to_string(path).await?;
    let products = parse_catalog(&content)?;
    info!(products = products.len(), "Parsed catalog");

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    let mut failed = 0_usize;
    for new in &products {
        match repo.create(new).await {
            Ok(product) => info!(
                product_id = %product.id(),
                name = %new.name,
                sizes = product.inventory.len(),
                "Inserted product"
            ),
            Err(e) => {
                failed += 1;
                error!(name = %new.name, error = %e, "Failed to insert product");
            }
        }
    }

    info!("Seeding complete!");
    info!("  Products inserted: {}", products.len() - failed);

    if failed > 0 {
        return Err(format!("{failed} products failed to insert").into());
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn parses_prices_and_initial_stock() {
        let products = parse_catalog(
            r#"
- name: Baggy Azul
  price: "$50.00"
  category: hombre
  tag: baggy
  images: [/img/baggy-azul.jpg]
  inventory:
    - { size: "32", stock: 4 }
    - { size: "34", stock: -2 }
- name: Mom Jean
  price: 42.5
"#,
        )
        .unwrap();

        assert_eq!(products.len(), 2);
        assert_eq!(products[0].price.to_string(), "50.00");
        assert_eq!(products[0].inventory.len(), 2);
        assert_eq!(products[0].inventory[1].stock, -2);
        assert_eq!(products[1].price.to_string(), "42.50");
        assert!(products[1].inventory.is_empty());
        assert!(products[1].category.is_none());
    }

    #[test]
    fn rejects_a_blank_size() {
        let result = parse_catalog(
            r#"
- name: Slim
  price: "10"
  inventory:
    - { size: "  ", stock: 1 }
"#,
        );
        assert!(result.is_err());
    }
}
