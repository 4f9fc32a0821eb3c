//! Model name derivation from file paths
//!
//! Editors know the file being edited, not the model name. dbt names a model
//! after its file stem, so `models/staging/stg_orders.sql` is `stg_orders`.

use std::path::Path;

const MODEL_FILE_EXTENSIONS: &[&str] = &["sql", "yml"];

/// Model name for a `.sql` or `.yml` file, `None` for anything else
pub fn model_name_from_path(path: &Path) -> Option<String> {
    let extension = path.extension()?.to_str()?;
    if !MODEL_FILE_EXTENSIONS.contains(&extension) {
        return None;
    }

    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(str::to_string)
}
