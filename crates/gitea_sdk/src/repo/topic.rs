use serde::{Deserialize, Serialize};

use crate::client::{Client, Result, api_path};
use crate::http::HttpMethod;
use crate::pagination::{ListOptions, Page};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
struct TopicsList {
    #[serde(default)]
    topics: Vec<String>,
}

impl Client {
    /// List the topics of a repository.
    pub async fn list_repo_topics(
        &self,
        owner: &str,
        repo: &str,
        opt: &ListOptions,
    ) -> Result<Page<String>> {
        let (list, query) = self.paged_query(opt);
        let (topics, response) = self
            .request(HttpMethod::Get, api_path!("/repos/{}/{}/topics", owner, repo))
            .query(query)
            .send::<TopicsList>()
            .await?;
        Ok(crate::client::into_page(topics.topics, response, &list))
    }

    /// Replace all topics of the repository.
    pub async fn set_repo_topics(&self, owner: &str, repo: &str, topics: &[String]) -> Result<()> {
        let body = TopicsList {
            topics: topics.to_vec(),
        };
        self.request(HttpMethod::Put, api_path!("/repos/{}/{}/topics", owner, repo))
            .json(&body)?
            .send_empty()
            .await?;
        Ok(())
    }

    /// Add a topic to a repository.
    pub async fn add_repo_topic(&self, owner: &str, repo: &str, topic: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Put,
            &api_path!("/repos/{}/{}/topics/{}", owner, repo, topic),
        )
        .await
    }

    /// Remove a topic from a repository.
    pub async fn delete_repo_topic(&self, owner: &str, repo: &str, topic: &str) -> Result<()> {
        self.send_empty(
            HttpMethod::Delete,
            &api_path!("/repos/{}/{}/topics/{}", owner, repo, topic),
        )
        .await
    }
}
