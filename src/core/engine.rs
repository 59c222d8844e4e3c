use crate::core::snapshot;
use crate::core::{ConfigProvider, Inventory, Storage, Textbook};
use crate::utils::error::Result;
use std::io::{BufRead, Write};

/// Interactive session over one catalog. The engine owns the inventory for
/// the lifetime of the session; the caller constructs it (usually from a
/// loaded snapshot) and passes it in together with the storage backend.
///
/// Input and output are generic so tests can drive a full session through
/// in-memory buffers. A failed prompt abandons the current command and
/// returns to the menu without touching catalog state.
pub struct StoreEngine<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
    inventory: Inventory,
}

impl<S: Storage, C: ConfigProvider> StoreEngine<S, C> {
    pub fn new(storage: S, config: C, inventory: Inventory) -> Self {
        Self {
            storage,
            config,
            inventory,
        }
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Runs the menu loop until the user selects Exit or input ends.
    pub async fn run<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        loop {
            display_menu(output)?;
            let choice = match prompt_line(input, output, "Enter your choice: ")? {
                Some(choice) => choice,
                None => {
                    writeln!(output, "Exiting the program.")?;
                    break;
                }
            };

            match choice.trim() {
                "1" => self.add_textbook(input, output)?,
                "2" => self.remove_textbook(input, output)?,
                "3" => self.display_textbook(input, output)?,
                "4" => self.display_inventory(output)?,
                "5" => self.save_inventory(output).await?,
                "0" => {
                    writeln!(output, "Exiting the program.")?;
                    break;
                }
                _ => writeln!(output, "Invalid choice. Please try again.")?,
            }
        }

        Ok(())
    }

    fn add_textbook<R: BufRead, W: Write>(&mut self, input: &mut R, output: &mut W) -> Result<()> {
        let Some(sku) = prompt_i32(input, output, "Enter SKU: ")? else {
            return Ok(());
        };

        // SKU uniqueness is a store convention, enforced here rather than by
        // the collection itself.
        if self.inventory.find_by_sku(sku).is_some() {
            writeln!(
                output,
                "Textbook with SKU {} already exists in the inventory.",
                sku
            )?;
            return Ok(());
        }

        let Some(title) = prompt_line(input, output, "Enter title: ")? else {
            return Ok(());
        };
        let Some(price) = prompt_f64(input, output, "Enter price: $")? else {
            return Ok(());
        };
        let Some(quantity) = prompt_i32(input, output, "Enter quantity: ")? else {
            return Ok(());
        };

        self.inventory.add(Textbook::new(sku, title, price, quantity));
        tracing::debug!("Added textbook with SKU {}", sku);
        writeln!(output, "Textbook added to the inventory.")?;
        Ok(())
    }

    fn remove_textbook<R: BufRead, W: Write>(
        &mut self,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        let Some(sku) = prompt_i32(input, output, "Enter SKU to remove: ")? else {
            return Ok(());
        };

        // Look the record up first so the removal can be reported.
        match self.inventory.find_by_sku(sku).cloned() {
            Some(removed) => {
                self.inventory.remove_by_sku(sku);
                tracing::debug!("Removed every textbook with SKU {}", sku);
                writeln!(output, "Textbook removed from the inventory: {}", removed)?;
            }
            None => {
                writeln!(
                    output,
                    "Textbook with SKU {} not found in the inventory.",
                    sku
                )?;
            }
        }
        Ok(())
    }

    fn display_textbook<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        output: &mut W,
    ) -> Result<()> {
        let Some(sku) = prompt_i32(input, output, "Enter SKU to display: ")? else {
            return Ok(());
        };

        match self.inventory.find_by_sku(sku) {
            Some(book) => writeln!(output, "Textbook information: {}", book)?,
            None => writeln!(
                output,
                "Textbook with SKU {} not found in the inventory.",
                sku
            )?,
        }
        Ok(())
    }

    fn display_inventory<W: Write>(&self, output: &mut W) -> Result<()> {
        if self.inventory.is_empty() {
            writeln!(output, "Inventory is empty.")?;
        } else {
            writeln!(output, "Inventory:")?;
            for book in self.inventory.books() {
                writeln!(output, "{}", book)?;
            }
        }
        Ok(())
    }

    async fn save_inventory<W: Write>(&self, output: &mut W) -> Result<()> {
        let path = self.config.data_file();
        match snapshot::save_snapshot(&self.storage, path, &self.inventory).await {
            Ok(()) => {
                tracing::info!("Inventory saved to {}", path);
                writeln!(output, "Inventory saved to file.")?;
            }
            Err(e) => {
                // A failed save never ends the session.
                tracing::error!("Failed to save the inventory to {}: {}", path, e);
                writeln!(output, "Failed to save the inventory: {}", e)?;
            }
        }
        Ok(())
    }
}

fn display_menu<W: Write>(output: &mut W) -> Result<()> {
    writeln!(output)?;
    writeln!(output, "Menu:")?;
    writeln!(output, "1. Add a textbook to the inventory")?;
    writeln!(output, "2. Remove a textbook from the inventory")?;
    writeln!(output, "3. Display the information for a textbook")?;
    writeln!(output, "4. Display the inventory")?;
    writeln!(output, "5. Save the inventory to file")?;
    writeln!(output, "0. Exit")?;
    Ok(())
}

/// Prints the prompt and reads one line. `None` means end of input.
fn prompt_line<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<String>> {
    write!(output, "{}", prompt)?;
    output.flush()?;

    let mut line = String::new();
    let bytes_read = input.read_line(&mut line)?;
    if bytes_read == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn prompt_i32<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<i32>> {
    let Some(raw) = prompt_line(input, output, prompt)? else {
        return Ok(None);
    };

    match raw.trim().parse::<i32>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            writeln!(output, "Invalid number. Please try again.")?;
            Ok(None)
        }
    }
}

fn prompt_f64<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    prompt: &str,
) -> Result<Option<f64>> {
    let Some(raw) = prompt_line(input, output, prompt)? else {
        return Ok(None);
    };

    match raw.trim().parse::<f64>() {
        Ok(value) => Ok(Some(value)),
        Err(_) => {
            writeln!(output, "Invalid number. Please try again.")?;
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::StoreError;
    use std::collections::HashMap;
    use std::io::Cursor;
    use std::sync::Arc;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                StoreError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }
    }

    struct MockConfig;

    impl ConfigProvider for MockConfig {
        fn data_file(&self) -> &str {
            "inventory.ser"
        }

        fn base_path(&self) -> &str {
            "."
        }

        fn verbose(&self) -> bool {
            false
        }
    }

    async fn run_session(
        script: &str,
        inventory: Inventory,
    ) -> (StoreEngine<MockStorage, MockConfig>, String) {
        let mut engine = StoreEngine::new(MockStorage::new(), MockConfig, inventory);
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();

        engine.run(&mut input, &mut output).await.unwrap();
        (engine, String::from_utf8(output).unwrap())
    }

    #[tokio::test]
    async fn test_menu_is_displayed_and_exit_selected() {
        let (_, output) = run_session("0\n", Inventory::new()).await;

        assert!(output.contains("Menu:"));
        assert!(output.contains("1. Add a textbook to the inventory"));
        assert!(output.contains("0. Exit"));
        assert!(output.contains("Exiting the program."));
    }

    #[tokio::test]
    async fn test_add_then_display_textbook() {
        let script = "1\n100\nAlgebra\n49.99\n3\n3\n100\n0\n";
        let (engine, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Textbook added to the inventory."));
        assert!(output.contains(
            "Textbook information: SKU: 100, Title: Algebra, Price: $49.99, Quantity: 3"
        ));
        assert_eq!(engine.inventory().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_sku_is_rejected_at_the_menu() {
        let script = "1\n100\nAlgebra\n49.99\n3\n1\n100\n0\n";
        let (engine, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Textbook with SKU 100 already exists in the inventory."));
        assert_eq!(engine.inventory().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_reports_the_removed_textbook() {
        let script = "2\n100\n0\n";
        let mut inventory = Inventory::new();
        inventory.add(Textbook::new(100, "Algebra", 49.99, 3));

        let (engine, output) = run_session(script, inventory).await;

        assert!(output.contains(
            "Textbook removed from the inventory: SKU: 100, Title: Algebra, Price: $49.99, Quantity: 3"
        ));
        assert!(engine.inventory().is_empty());
    }

    #[tokio::test]
    async fn test_remove_clears_every_duplicate_sku() {
        let script = "2\n7\n4\n0\n";
        let inventory = Inventory::from_books(vec![
            Textbook::new(7, "First Edition", 10.0, 1),
            Textbook::new(7, "Second Edition", 20.0, 2),
        ]);

        let (engine, output) = run_session(script, inventory).await;

        assert!(output.contains("Textbook removed from the inventory: SKU: 7, Title: First Edition"));
        assert!(output.contains("Inventory is empty."));
        assert!(engine.inventory().is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_sku_reports_not_found() {
        let script = "2\n42\n0\n";
        let (engine, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Textbook with SKU 42 not found in the inventory."));
        assert!(engine.inventory().is_empty());
    }

    #[tokio::test]
    async fn test_display_missing_sku_reports_not_found() {
        let script = "3\n42\n0\n";
        let (_, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Textbook with SKU 42 not found in the inventory."));
    }

    #[tokio::test]
    async fn test_display_inventory_distinguishes_empty_from_populated() {
        let script = "4\n1\n100\nAlgebra\n49.99\n3\n4\n0\n";
        let (_, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Inventory is empty."));
        assert!(output.contains("Inventory:"));
        assert!(output.contains("SKU: 100, Title: Algebra, Price: $49.99, Quantity: 3"));
    }

    #[tokio::test]
    async fn test_invalid_menu_choice() {
        let script = "9\n0\n";
        let (_, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Invalid choice. Please try again."));
    }

    #[tokio::test]
    async fn test_malformed_number_aborts_the_command() {
        let script = "1\nnot-a-number\n0\n";
        let (engine, output) = run_session(script, Inventory::new()).await;

        assert!(output.contains("Invalid number. Please try again."));
        assert!(engine.inventory().is_empty());
    }

    #[tokio::test]
    async fn test_save_writes_snapshot_to_storage() {
        let script = "1\n100\nAlgebra\n49.99\n3\n5\n0\n";
        let storage = MockStorage::new();
        let mut engine = StoreEngine::new(storage.clone(), MockConfig, Inventory::new());
        let mut input = Cursor::new(script.as_bytes().to_vec());
        let mut output: Vec<u8> = Vec::new();

        engine.run(&mut input, &mut output).await.unwrap();

        let rendered = String::from_utf8(output).unwrap();
        assert!(rendered.contains("Inventory saved to file."));

        let raw = storage.get_file("inventory.ser").await.unwrap();
        let doc: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(doc["books"][0]["sku"], 100);
    }

    #[tokio::test]
    async fn test_end_of_input_exits_the_session() {
        let (_, output) = run_session("", Inventory::new()).await;
        assert!(output.contains("Exiting the program."));
    }
}
