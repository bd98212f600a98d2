//! Fixed question-answering pipeline
//!
//! Three sequential stages per run: retrieve, assemble, generate. No
//! branching, no retries at this layer. Every failure aborts the run; a
//! partial answer is never produced.

use std::sync::Arc;

use crate::collection::collection_name;
use crate::config::QaConfig;
use crate::context::ContextFormatter;
use crate::errors::Result;
use crate::models::{ChatModel, OllamaChatModel, OllamaEmbeddings};
use crate::progress::{ProgressChannel, ProgressEvent};
use crate::prompt::PromptTemplate;
use crate::qa::derived::DerivedCell;
use crate::qa::QuestionAnswerer;
use crate::retrieval::{RetrievalEngine, Retriever};

use async_trait::async_trait;

/// Question-answering pipeline over one persisted collection.
///
/// Construction resolves the component graph in dependency order (chat
/// model, embedding model, stores, retrieval engine) and fails fast on a
/// missing collection or invalid configuration. The derived components are
/// built once and reused across runs; replacing the configuration rebuilds
/// only the components whose declared fields changed.
pub struct QuestionAnsweringPipeline {
    config: QaConfig,
    template: PromptTemplate,
    formatter: ContextFormatter,
    progress: ProgressChannel,
    chat: DerivedCell<dyn ChatModel>,
    retriever: DerivedCell<dyn Retriever>,
}

impl QuestionAnsweringPipeline {
    /// Open a pipeline over the collection addressed by `config.file_names`.
    ///
    /// Fatal here: invalid configuration, malformed template, unreadable
    /// snapshots, or no persisted collection for the file set.
    pub fn open(config: QaConfig) -> Result<Self> {
        let pipeline = Self::assemble(config)?;
        pipeline.chat_model()?;
        pipeline.retriever()?;
        Ok(pipeline)
    }

    /// Build a pipeline around externally constructed collaborators.
    ///
    /// The injected components are kept until a configuration change
    /// invalidates them.
    pub fn with_components(
        config: QaConfig,
        retriever: Arc<dyn Retriever>,
        chat: Arc<dyn ChatModel>,
    ) -> Result<Self> {
        let pipeline = Self::assemble(config)?;
        pipeline
            .chat
            .prime(pipeline.config.model.chat_key(), chat);
        pipeline
            .retriever
            .prime(pipeline.config.retrieval_key(), retriever);
        Ok(pipeline)
    }

    fn assemble(config: QaConfig) -> Result<Self> {
        config.validate()?;
        let template = PromptTemplate::new(&config.prompt_template)?;
        Ok(Self {
            config,
            template,
            formatter: ContextFormatter::new(),
            progress: ProgressChannel::new(),
            chat: DerivedCell::new(),
            retriever: DerivedCell::new(),
        })
    }

    /// Current configuration
    pub fn config(&self) -> &QaConfig {
        &self.config
    }

    /// Progress channel for context/prompt observability
    pub fn progress(&self) -> &ProgressChannel {
        &self.progress
    }

    /// Replace the configuration.
    ///
    /// Derived components whose declared fields changed are rebuilt here;
    /// unchanged ones are reused as-is.
    pub fn set_config(&mut self, config: QaConfig) -> Result<()> {
        config.validate()?;
        self.template = PromptTemplate::new(&config.prompt_template)?;
        self.config = config;
        self.chat_model()?;
        self.retriever()?;
        Ok(())
    }

    /// Chat model derived from the model configuration
    pub fn chat_model(&self) -> Result<Arc<dyn ChatModel>> {
        self.chat.get_or_build(self.config.model.chat_key(), || {
            Ok(Arc::new(OllamaChatModel::new(&self.config.model)?) as Arc<dyn ChatModel>)
        })
    }

    /// Retrieval engine derived from storage and embedding configuration
    pub fn retriever(&self) -> Result<Arc<dyn Retriever>> {
        self.retriever.get_or_build(self.config.retrieval_key(), || {
            let embedding = Arc::new(OllamaEmbeddings::new(&self.config.model)?);
            let collection = collection_name(&self.config.file_names);
            let collection_dir = self.config.storage_root.join(collection);
            let engine = RetrievalEngine::load(&collection_dir, embedding)?;
            Ok(Arc::new(engine) as Arc<dyn Retriever>)
        })
    }

    /// Answer one question: retrieve, assemble, generate.
    ///
    /// Returns the model's text output verbatim, or the first error
    /// encountered. Progress events are emitted after formatting and after
    /// prompt assembly; they cannot fail the run.
    pub async fn run(&self, question: &str) -> Result<String> {
        let documents = self
            .retriever()?
            .retrieve(question, self.config.retrieval_top_k)
            .await?;

        let context = self.formatter.format(&documents);
        self.progress.emit(ProgressEvent::Context {
            text: context.clone(),
        });

        let prompt = self.template.populate(question, &context)?;
        self.progress.emit(ProgressEvent::Prompt {
            text: prompt.clone(),
        });

        let answer = self.chat_model()?.generate(&prompt).await?;
        Ok(answer)
    }
}

#[async_trait]
impl QuestionAnswerer for QuestionAnsweringPipeline {
    async fn answer(&self, question: &str) -> Result<String> {
        self.run(question).await
    }
}
