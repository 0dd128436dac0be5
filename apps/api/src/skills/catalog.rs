use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Maximum number of entries returned by a catalog search.
pub const SEARCH_LIMIT: usize = 50;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SkillCatalogEntry {
    pub skill_id: String,
    pub skill_name: String,
    pub platform_group: String,
}

/// Immutable, ordered master list of skills.
/// Built once at startup and shared through `AppState`; tests build their own.
#[derive(Debug, Clone, Default)]
pub struct SkillCatalog {
    entries: Vec<SkillCatalogEntry>,
}

impl SkillCatalog {
    pub fn new(entries: Vec<SkillCatalogEntry>) -> Self {
        Self { entries }
    }

    /// The master list shipped with the service.
    pub fn builtin() -> Self {
        Self::new(
            BUILTIN_SKILLS
                .iter()
                .map(|(id, name, group)| SkillCatalogEntry {
                    skill_id: id.to_string(),
                    skill_name: name.to_string(),
                    platform_group: group.to_string(),
                })
                .collect(),
        )
    }

    /// Loads a catalog from a JSON array of `{skill_id, skill_name, platform_group}` objects.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read skill catalog at {}", path.display()))?;
        let entries: Vec<SkillCatalogEntry> = serde_json::from_str(&raw)
            .with_context(|| format!("Skill catalog at {} is not valid JSON", path.display()))?;
        let catalog = Self::new(entries);
        if catalog.is_empty() {
            bail!("Skill catalog at {} has no entries", path.display());
        }
        Ok(catalog)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-insensitive name lookup. First match in catalog order wins.
    pub fn find_by_name(&self, name: &str) -> Option<&SkillCatalogEntry> {
        let needle = name.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|e| e.skill_name.trim().to_lowercase() == needle)
    }

    /// Case-insensitive substring search on name and/or group, capped at `SEARCH_LIMIT`.
    /// Empty filters match everything. The query is matched as typed, spaces included;
    /// the group filter is trimmed.
    pub fn search(&self, query: &str, group: &str) -> Vec<&SkillCatalogEntry> {
        let query = query.to_lowercase();
        let group = group.trim().to_lowercase();

        self.entries
            .iter()
            .filter(|e| query.is_empty() || e.skill_name.to_lowercase().contains(&query))
            .filter(|e| group.is_empty() || e.platform_group.to_lowercase().contains(&group))
            .take(SEARCH_LIMIT)
            .collect()
    }
}

const BUILTIN_SKILLS: &[(&str, &str, &str)] = &[
    ("SK00001", "ANN", "AI-ML"),
    ("SK00002", "CNN", "AI-ML"),
    ("SK00003", "Computer Vision", "AI-ML"),
    ("SK00004", "Deep Learning", "AI-ML"),
    ("SK00005", "Keras", "AI-ML"),
    ("SK00006", "LangChain", "AI-ML"),
    ("SK00007", "LangGraph", "AI-ML"),
    ("SK00008", "LightGBM", "AI-ML"),
    ("SK00009", "MLflow", "AI-ML"),
    ("SK00010", "Machine Learning", "AI-ML"),
    ("SK00011", "Natural Language Processing", "AI-ML"),
    ("SK00012", "PyTorch", "AI-ML"),
    ("SK00013", "RAG", "AI-ML"),
    ("SK00014", "Scikit-learn", "AI-ML"),
    ("SK00015", "TensorFlow", "AI-ML"),
    ("SK00016", "Time Series Forecasting", "AI-ML"),
    ("SK00017", "XGBoost", "AI-ML"),
    ("SK00018", "Hugging Face Transformers", "AI-ML"),
    ("SK00019", "MLflow (Python)", "AI-ML"),
    ("SK00020", "Prompt Engineering", "AI-ML"),
    ("SK00021", "AWS Bedrock", "AWS"),
    ("SK00022", "AWS CloudFormation", "AWS"),
    ("SK00023", "AWS CloudWatch", "AWS"),
    ("SK00024", "AWS Glue", "AWS"),
    ("SK00025", "AWS IAM", "AWS"),
    ("SK00026", "AWS Lambda", "AWS"),
    ("SK00027", "AWS SageMaker", "AWS"),
    ("SK00028", "Amazon Athena", "AWS"),
    ("SK00029", "Amazon EC2", "AWS"),
    ("SK00030", "Amazon EMR", "AWS"),
    ("SK00031", "Amazon Redshift", "AWS"),
    ("SK00032", "Amazon S3", "AWS"),
    ("SK00033", "AWS KMS", "AWS"),
    ("SK00034", "Amazon Kinesis", "AWS"),
    ("SK00035", "Databricks (AWS)", "AWS"),
    ("SK00036", "Azure Blob Storage", "Azure"),
    ("SK00037", "Azure Data Factory", "Azure"),
    ("SK00038", "Azure Data Lake Storage Gen2", "Azure"),
    ("SK00039", "Azure Databricks", "Azure"),
    ("SK00040", "Azure DevOps", "Azure"),
    ("SK00041", "Azure Event Hub", "Azure"),
    ("SK00042", "Azure Functions", "Azure"),
    ("SK00043", "Azure Key Vault", "Azure"),
    ("SK00044", "Azure Machine Learning", "Azure"),
    ("SK00045", "Azure OpenAI", "Azure"),
    ("SK00046", "Azure Synapse Analytics", "Azure"),
    ("SK00047", "Business requirement analysis", "Base"),
    ("SK00048", "Data Science", "Base"),
    ("SK00049", "FastAPI", "Base"),
    ("SK00050", "Flask", "Base"),
    ("SK00051", "Google BigQuery", "Base"),
    ("SK00052", "Java", "Base"),
    ("SK00053", "JavaScript", "Base"),
    ("SK00054", "Microsoft Fabric", "Base"),
    ("SK00055", "PySpark", "Base"),
    ("SK00056", "Python", "Base"),
    ("SK00057", "R", "Base"),
    ("SK00058", "Scala", "Base"),
    ("SK00059", "Snowflake", "Base"),
    ("SK00060", "Async Programming (asyncio)", "Base"),
    ("SK00061", "Auto Loader", "Base"),
    ("SK00062", "Bash", "Base"),
    ("SK00063", "C++", "Base"),
    ("SK00064", "Cassandra", "Base"),
    ("SK00065", "Data Vault Modeling", "Base"),
    ("SK00066", "Dimensional Modeling", "Base"),
    ("SK00067", "Dockerizing Python Apps", "Base"),
    ("SK00068", "DynamoDB", "Base"),
    ("SK00069", "IBM DB2", "Base"),
    ("SK00070", "Informatica PowerCenter", "Base"),
    ("SK00071", "LangChain (Python)", "Base"),
    ("SK00072", "MongoDB", "Base"),
    ("SK00073", "Neo4j", "Base"),
    ("SK00074", "NumPy", "Base"),
    ("SK00075", "OOP in Python", "Base"),
    ("SK00076", "Oracle", "Base"),
    ("SK00077", "Pandas", "Base"),
    ("SK00078", "Pentaho PDI", "Base"),
    ("SK00079", "PowerShell", "Base"),
    ("SK00080", "PyTest", "Base"),
    ("SK00081", "Query Optimization", "Base"),
    ("SK00082", "Redis", "Base"),
    ("SK00083", "Stored Procedures", "Base"),
    ("SK00084", "Talend", "Base"),
    ("SK00085", "Teradata", "Base"),
    ("SK00086", "Window Functions", "Base"),
    ("SK00087", "DBT", "Base"),
    ("SK00088", "Power BI", "BI"),
    ("SK00089", "QuickSight", "BI"),
    ("SK00090", "SSAS", "BI"),
    ("SK00091", "SSIS", "BI"),
    ("SK00092", "SSRS", "BI"),
    ("SK00093", "Tableau", "BI"),
    ("SK00094", "DAX", "BI"),
    ("SK00095", "Apache NiFi", "BigData"),
    ("SK00096", "Hadoop", "BigData"),
    ("SK00097", "Hive", "BigData"),
    ("SK00098", "Kafka", "BigData"),
    ("SK00099", "Kafka Streams", "BigData"),
    ("SK00100", "Spark", "BigData"),
    ("SK00101", "Airflow", "BigData"),
    ("SK00102", "Apache Iceberg", "BigData"),
    ("SK00103", "Apache Kafka", "BigData"),
    ("SK00104", "Apache Spark", "BigData"),
    ("SK00105", "Dask", "BigData"),
    ("SK00106", "Structured Streaming", "BigData"),
    ("SK00107", "Databricks", "Databricks"),
    ("SK00108", "Delta Lake", "Databricks"),
    ("SK00109", "Delta Live Tables", "Databricks"),
    ("SK00110", "Unity Catalog", "Databricks"),
    ("SK00111", "Databricks (GCP)", "Databricks"),
    ("SK00112", "Databricks CLI", "Databricks"),
    ("SK00113", "Databricks Feature Store", "Databricks"),
    ("SK00114", "Databricks REST API", "Databricks"),
    ("SK00115", "Databricks Runtime", "Databricks"),
    ("SK00116", "Databricks Runtime for ML", "Databricks"),
    ("SK00117", "Databricks SQL", "Databricks"),
    ("SK00118", "Databricks SQL Warehouse", "Databricks"),
    ("SK00119", "Mosaic AI", "Databricks"),
    ("SK00120", "Docker", "DevOps"),
    ("SK00121", "Git", "DevOps"),
    ("SK00122", "Jenkins", "DevOps"),
    ("SK00123", "Kubernetes", "DevOps"),
    ("SK00124", "Terraform", "DevOps"),
    ("SK00125", "Autosys", "DevOps"),
    ("SK00126", "Cloud Composer", "DevOps"),
    ("SK00127", "Control-M", "DevOps"),
    ("SK00128", "Banking Analytics", "Domain"),
    ("SK00129", "Bioinformatics", "Domain"),
    ("SK00130", "Data Analytics", "Domain"),
    ("SK00131", "Gene Annotation", "Domain"),
    ("SK00132", "Healthcare AI", "Domain"),
    ("SK00133", "Human and Bacterial Genomics", "Domain"),
    ("SK00134", "Industrial IoT", "Domain"),
    ("SK00135", "Marketing Analytics", "Domain"),
    ("SK00136", "Metagenomics", "Domain"),
    ("SK00137", "Protein Structure Modelling", "Domain"),
    ("SK00138", "Single Cell Omics", "Domain"),
    ("SK00139", "Vibration Analytics", "Domain"),
    ("SK00140", "Business Intelligence", "Functional"),
    ("SK00141", "Capacity Planning", "Functional"),
    ("SK00142", "Data Architecture", "Functional"),
    ("SK00143", "Data Engineering", "Functional"),
    ("SK00144", "Data Governance", "Functional"),
    ("SK00145", "Data Migration", "Functional"),
    ("SK00146", "Data Modernization", "Functional"),
    ("SK00147", "Designing scalable architecture", "Functional"),
    ("SK00148", "End-to-end analytics solution designing", "Functional"),
    ("SK00149", "Performance Optimization", "Functional"),
    ("SK00150", "Root Cause Analysis", "Functional"),
    ("SK00151", "Agile", "Soft"),
    ("SK00152", "Consulting", "Soft"),
    ("SK00153", "Insight generation", "Soft"),
    ("SK00154", "Pre-Sales", "Soft"),
    ("SK00155", "Product Management", "Soft"),
    ("SK00156", "Requirement gathering", "Soft"),
    ("SK00157", "Research manuscript writing", "Soft"),
    ("SK00158", "Scrum planning", "Soft"),
    ("SK00159", "Sprint planning", "Soft"),
    ("SK00160", "Stakeholder management", "Soft"),
    ("SK00161", "Team management", "Soft"),
    ("SK00162", "PL/SQL", "SQL"),
    ("SK00163", "SQL", "SQL"),
    ("SK00164", "Spark SQL", "SQL"),
    ("SK00165", "T-SQL", "SQL"),
    ("SK00166", "ANSI SQL", "SQL"),
    ("SK00167", "BigQuery SQL", "SQL"),
    ("SK00168", "MySQL", "SQL"),
    ("SK00169", "PostgreSQL", "SQL"),
    ("SK00170", "Redshift SQL", "SQL"),
    ("SK00171", "SQL Server", "SQL"),
    ("SK00172", "Snowflake SQL", "SQL"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn entry(id: &str, name: &str, group: &str) -> SkillCatalogEntry {
        SkillCatalogEntry {
            skill_id: id.to_string(),
            skill_name: name.to_string(),
            platform_group: group.to_string(),
        }
    }

    #[test]
    fn test_builtin_has_every_master_entry() {
        let catalog = SkillCatalog::builtin();
        assert_eq!(catalog.len(), 172);
        assert_eq!(catalog.entries[0].skill_id, "SK00001");
        assert_eq!(catalog.entries[171].skill_id, "SK00172");
    }

    #[test]
    fn test_find_by_name_is_case_insensitive_and_trimmed() {
        let catalog = SkillCatalog::builtin();
        let python = catalog.find_by_name("  pYtHoN ").unwrap();
        assert_eq!(python.skill_id, "SK00056");
        assert_eq!(python.platform_group, "Base");
    }

    #[test]
    fn test_find_by_name_has_no_partial_match() {
        let catalog = SkillCatalog::builtin();
        assert!(catalog.find_by_name("Pyth").is_none());
        assert!(catalog.find_by_name("").is_none());
        assert!(catalog.find_by_name("   ").is_none());
        // "Spark" and "Apache Spark" are distinct entries
        assert_eq!(catalog.find_by_name("spark").unwrap().skill_id, "SK00100");
    }

    #[test]
    fn test_find_by_name_first_match_wins() {
        let catalog = SkillCatalog::new(vec![
            entry("A1", "Rust", "Base"),
            entry("A2", "rust", "Systems"),
        ]);
        assert_eq!(catalog.find_by_name("RUST").unwrap().skill_id, "A1");
    }

    #[test]
    fn test_search_is_capped_in_catalog_order() {
        let catalog = SkillCatalog::builtin();
        let results = catalog.search("", "");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert_eq!(results[0].skill_id, "SK00001");
        assert_eq!(results[49].skill_id, "SK00050");
    }

    #[test]
    fn test_search_by_group() {
        let catalog = SkillCatalog::builtin();
        let results = catalog.search("", "base");
        assert_eq!(results.len(), 41);
        assert!(results.iter().all(|e| e.platform_group == "Base"));
    }

    #[test]
    fn test_search_by_name_and_group() {
        let catalog = SkillCatalog::builtin();
        let results = catalog.search("SQL", "databricks");
        let ids: Vec<_> = results.iter().map(|e| e.skill_id.as_str()).collect();
        assert_eq!(ids, vec!["SK00117", "SK00118"]);
    }

    #[test]
    fn test_search_query_keeps_whitespace() {
        let catalog = SkillCatalog::builtin();
        let results = catalog.search(" ", "");
        assert_eq!(results.len(), SEARCH_LIMIT);
        assert!(results.iter().all(|e| e.skill_name.contains(' ')));

        let padded = catalog.search(" python", "");
        let names: Vec<_> = padded.iter().map(|e| e.skill_name.as_str()).collect();
        assert_eq!(names, vec!["Dockerizing Python Apps", "OOP in Python"]);
    }

    #[test]
    fn test_search_group_is_trimmed() {
        let catalog = SkillCatalog::builtin();
        assert_eq!(catalog.search("", "  base ").len(), 41);
    }

    #[test]
    fn test_search_over_large_fake_catalog() {
        let entries = (0..120)
            .map(|i| entry(&format!("X{i:03}"), &format!("Tool {i}"), "Fake"))
            .collect();
        let catalog = SkillCatalog::new(entries);
        let results = catalog.search("tool", "");
        assert_eq!(results.len(), 50);
        assert_eq!(results[0].skill_id, "X000");
        assert_eq!(results[49].skill_id, "X049");
    }

    #[test]
    fn test_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"skill_id":"C1","skill_name":"Zig","platform_group":"Base"}}]"#
        )
        .unwrap();
        let catalog = SkillCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.find_by_name("zig").unwrap().skill_id, "C1");
    }

    #[test]
    fn test_from_json_file_rejects_garbage() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        assert!(SkillCatalog::from_json_file(file.path()).is_err());
    }

    #[test]
    fn test_from_json_file_rejects_empty_list() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();
        assert!(SkillCatalog::from_json_file(file.path()).is_err());
    }
}
