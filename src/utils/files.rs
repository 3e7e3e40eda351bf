use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::{
    fs::File,
    io::{self, AsyncBufReadExt, Lines},
};

/// Read a file from the given path into a list of strings
pub async fn read_file<P: AsRef<Path>>(path: P) -> io::Result<Vec<String>> {
    let mut r = file_reader(path).await?;
    let mut lines = Vec::new();

    while let Some(line) = r.next_line().await? {
        lines.push(line);
    }

    Ok(lines)
}

async fn file_reader<P: AsRef<Path>>(path: P) -> io::Result<Lines<io::BufReader<File>>> {
    let f = File::open(path).await?;

    Ok(io::BufReader::new(f).lines())
}

/// Read and deserialize a JSON file
pub async fn read_json<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> anyhow::Result<T> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Unable to read {}: {}", path.display(), e))?;

    serde_json::from_str(&contents).map_err(|e| anyhow!("Unable to parse {}: {}", path.display(), e))
}

/// Read and deserialize a YAML file
pub async fn read_yaml<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> anyhow::Result<T> {
    let path = path.as_ref();
    let contents = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("Unable to read {}: {}", path.display(), e))?;

    serde_yaml::from_str(&contents).map_err(|e| anyhow!("Unable to parse {}: {}", path.display(), e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    #[tokio::test]
    async fn reads_lines_and_json() {
        let dir = tempfile::tempdir().unwrap();

        let text = dir.path().join("input.txt");
        std::fs::write(&text, "first line\nsecond line\n").unwrap();
        assert_eq!(read_file(&text).await.unwrap(), vec!["first line", "second line"]);

        let json = dir.path().join("map.json");
        std::fs::write(&json, r#"{"a": 1}"#).unwrap();
        let map: HashMap<String, usize> = read_json(&json).await.unwrap();
        assert_eq!(map["a"], 1);
    }

    #[tokio::test]
    async fn reports_the_missing_path() {
        let err = read_json::<HashMap<String, usize>, _>("does/not/exist.json")
            .await
            .unwrap_err();

        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
