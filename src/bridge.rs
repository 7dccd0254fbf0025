use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_bedrockagentruntime::error::DisplayErrorContext;
use aws_sdk_bedrockagentruntime::types::{
    KnowledgeBaseRetrieveAndGenerateConfiguration, RetrieveAndGenerateConfiguration,
    RetrieveAndGenerateInput, RetrieveAndGenerateType,
};
use aws_sdk_bedrockagentruntime::Client;
use thiserror::Error;
use tokio::time::{timeout, Duration};

/// Generated answer returned by the knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answer {
    pub text: String,
    pub session_id: String,
    pub citations: usize,
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("retrieve and generate timed out")]
    Timeout,
    #[error("{0}")]
    Request(String),
    #[error("retrieve and generate returned no output")]
    EmptyOutput,
}

impl GenerateError {
    fn request<E: std::error::Error>(err: E) -> Self {
        Self::Request(DisplayErrorContext(&err).to_string())
    }
}

#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<Answer, GenerateError>;
}

pub struct BedrockGenerator {
    client: Client,
    knowledge_base_id: String,
    model_arn: String,
}

impl BedrockGenerator {
    pub fn new(
        sdk_config: &SdkConfig,
        knowledge_base_id: impl Into<String>,
        model_arn: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(sdk_config),
            knowledge_base_id: knowledge_base_id.into(),
            model_arn: model_arn.into(),
        }
    }
}

fn knowledge_base_configuration(
    knowledge_base_id: &str,
    model_arn: &str,
) -> Result<RetrieveAndGenerateConfiguration, GenerateError> {
    let knowledge_base = KnowledgeBaseRetrieveAndGenerateConfiguration::builder()
        .knowledge_base_id(knowledge_base_id)
        .model_arn(model_arn)
        .build()
        .map_err(GenerateError::request)?;

    RetrieveAndGenerateConfiguration::builder()
        .r#type(RetrieveAndGenerateType::KnowledgeBase)
        .knowledge_base_configuration(knowledge_base)
        .build()
        .map_err(GenerateError::request)
}

#[async_trait]
impl Generator for BedrockGenerator {
    async fn generate(
        &self,
        question: &str,
        session_id: Option<&str>,
    ) -> Result<Answer, GenerateError> {
        let input = RetrieveAndGenerateInput::builder()
            .text(question)
            .build()
            .map_err(GenerateError::request)?;

        let response = self
            .client
            .retrieve_and_generate()
            .input(input)
            .retrieve_and_generate_configuration(knowledge_base_configuration(
                &self.knowledge_base_id,
                &self.model_arn,
            )?)
            .set_session_id(session_id.map(str::to_string))
            .send()
            .await
            .map_err(GenerateError::request)?;

        let output = response.output().ok_or(GenerateError::EmptyOutput)?;

        Ok(Answer {
            text: output.text().to_string(),
            session_id: response.session_id().to_string(),
            citations: response.citations().len(),
        })
    }
}

pub async fn ask_with_timeout(
    generator: &dyn Generator,
    question: &str,
    session_id: Option<&str>,
    timeout_ms: u64,
) -> Result<Answer, GenerateError> {
    timeout(
        Duration::from_millis(timeout_ms),
        generator.generate(question, session_id),
    )
    .await
    .map_err(|_| GenerateError::Timeout)?
}

/// Logs which AWS principal the function runs as. Failures are only warned about.
pub async fn verify_caller_identity(sdk_config: &SdkConfig) {
    let sts = aws_sdk_sts::Client::new(sdk_config);
    match sts.get_caller_identity().send().await {
        Ok(identity) => tracing::info!(
            account = identity.account().unwrap_or_default(),
            arn = identity.arn().unwrap_or_default(),
            "resolved AWS caller identity"
        ),
        Err(err) => tracing::warn!(
            error = %DisplayErrorContext(&err),
            "could not resolve AWS caller identity"
        ),
    }
}
