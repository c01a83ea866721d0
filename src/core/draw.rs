use crate::core::pool::load_list;
use crate::core::results::{load_results, save_results};
use crate::core::{ConfigProvider, DrawResults, Storage};
use crate::utils::error::{DrawError, Result};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use tokio::sync::Mutex;

/// Pool entries whose task value still has unused slots.
///
/// The check is per value, not per occurrence: while `used[t] < total[t]`
/// every occurrence of `t` stays in the list, so selection is weighted by raw
/// occurrence count.
pub fn available_tasks<'a>(tasks: &'a [String], results: &DrawResults) -> Vec<&'a str> {
    let mut total: HashMap<&str, usize> = HashMap::new();
    for task in tasks {
        *total.entry(task.as_str()).or_insert(0) += 1;
    }
    let used = results.used_counts();

    tasks
        .iter()
        .map(String::as_str)
        .filter(|task| used.get(task).copied().unwrap_or(0) < total[task])
        .collect()
}

/// Picks a task for `name` without touching storage.
pub fn pick_task<R: Rng + ?Sized>(
    name: &str,
    tasks: &[String],
    results: &DrawResults,
    rng: &mut R,
) -> Result<String> {
    if results.contains(name) {
        return Err(DrawError::AlreadyDrawn {
            name: name.to_string(),
        });
    }

    if tasks.is_empty() {
        return Err(DrawError::NoTasksConfigured);
    }

    let available = available_tasks(tasks, results);
    available
        .choose(rng)
        .map(|task| task.to_string())
        .ok_or(DrawError::PoolExhausted)
}

#[derive(Debug, Clone)]
struct DataFiles {
    tasks: String,
    participants: String,
    results: String,
}

/// Owns the results file. Every read-modify-write runs under one lock, so two
/// draws can never persist over each other.
pub struct DrawService<S: Storage> {
    storage: S,
    files: DataFiles,
    gate: Mutex<StdRng>,
}

impl<S: Storage> DrawService<S> {
    pub fn new<C: ConfigProvider>(storage: S, config: &C) -> Self {
        Self::with_rng(storage, config, StdRng::from_entropy())
    }

    pub fn with_rng<C: ConfigProvider>(storage: S, config: &C, rng: StdRng) -> Self {
        Self {
            storage,
            files: DataFiles {
                tasks: config.tasks_file().to_string(),
                participants: config.participants_file().to_string(),
                results: config.results_file().to_string(),
            },
            gate: Mutex::new(rng),
        }
    }

    /// 為參與者抽一個任務並寫回結果檔
    pub async fn draw(&self, name: &str) -> Result<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DrawError::MissingName);
        }

        let mut rng = self.gate.lock().await;

        let mut results = load_results(&self.storage, &self.files.results).await?;
        if results.contains(name) {
            return Err(DrawError::AlreadyDrawn {
                name: name.to_string(),
            });
        }

        let tasks = load_list(&self.storage, &self.files.tasks).await?;
        let chosen = pick_task(name, &tasks, &results, &mut *rng)?;

        results.insert(name.to_string(), chosen.clone());
        save_results(&self.storage, &self.files.results, &results).await?;

        tracing::info!(participant = %name, task = %chosen, "🎲 Draw recorded");
        Ok(chosen)
    }

    /// 尚未抽籤的參與者，依名單順序
    pub async fn remaining_participants(&self) -> Result<Vec<String>> {
        let _guard = self.gate.lock().await;

        let participants = load_list(&self.storage, &self.files.participants).await?;
        let results = load_results(&self.storage, &self.files.results).await?;

        Ok(participants
            .into_iter()
            .filter(|p| !results.contains(p))
            .collect())
    }

    pub async fn results(&self) -> Result<DrawResults> {
        let _guard = self.gate.lock().await;
        load_results(&self.storage, &self.files.results).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DrawConfig;
    use crate::core::mock::MockStorage;
    use std::sync::Arc;

    fn tasks(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn results(pairs: &[(&str, &str)]) -> DrawResults {
        pairs
            .iter()
            .map(|(p, t)| (p.to_string(), t.to_string()))
            .collect()
    }

    async fn service_with(task_file: &str, participant_file: &str) -> (DrawService<MockStorage>, MockStorage) {
        let storage = MockStorage::new();
        storage.put_file("tasks.txt", task_file).await;
        storage.put_file("participants.txt", participant_file).await;

        let service = DrawService::with_rng(
            storage.clone(),
            &DrawConfig::default(),
            StdRng::seed_from_u64(7),
        );
        (service, storage)
    }

    #[test]
    fn test_available_tasks_keeps_every_occurrence_while_value_has_room() {
        let pool = tasks(&["A", "A", "A", "B"]);
        let drawn = results(&[("alice", "A")]);

        assert_eq!(available_tasks(&pool, &drawn), vec!["A", "A", "A", "B"]);
    }

    #[test]
    fn test_available_tasks_drops_value_once_all_slots_used() {
        let pool = tasks(&["A", "B", "A"]);
        let drawn = results(&[("alice", "A"), ("bob", "A")]);

        assert_eq!(available_tasks(&pool, &drawn), vec!["B"]);
    }

    #[test]
    fn test_available_tasks_ignores_results_for_unknown_tasks() {
        let pool = tasks(&["A"]);
        let drawn = results(&[("alice", "retired task")]);

        assert_eq!(available_tasks(&pool, &drawn), vec!["A"]);
    }

    #[test]
    fn test_pick_task_error_order() {
        let mut rng = StdRng::seed_from_u64(1);
        let drawn = results(&[("carol", "A")]);

        assert!(matches!(
            pick_task("carol", &[], &drawn, &mut rng),
            Err(DrawError::AlreadyDrawn { .. })
        ));
        assert!(matches!(
            pick_task("dave", &[], &drawn, &mut rng),
            Err(DrawError::NoTasksConfigured)
        ));
        assert!(matches!(
            pick_task("dave", &tasks(&["A"]), &drawn, &mut rng),
            Err(DrawError::PoolExhausted)
        ));
    }

    #[test]
    fn test_pick_task_is_entry_weighted() {
        let pool = tasks(&["A", "A", "A", "B"]);
        let drawn = DrawResults::new();
        let mut rng = StdRng::seed_from_u64(42);

        let picks_of_a = (0..4000)
            .filter(|_| pick_task("x", &pool, &drawn, &mut rng).unwrap() == "A")
            .count();

        // 期望值 3000
        assert!((2700..3300).contains(&picks_of_a), "got {}", picks_of_a);
    }

    #[tokio::test]
    async fn test_draw_until_exhausted() {
        let (service, _) = service_with("A\nA\nB\n", "alice\nbob\ncarol\ndave\n").await;

        let mut drawn = Vec::new();
        for name in ["alice", "bob", "carol"] {
            let task = service.draw(name).await.unwrap();
            assert!(task == "A" || task == "B");
            drawn.push(task);
        }
        drawn.sort();
        assert_eq!(drawn, vec!["A", "A", "B"]);

        let err = service.draw("dave").await.unwrap_err();
        assert!(matches!(err, DrawError::PoolExhausted));
        assert_eq!(service.results().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_second_draw_rejected_and_result_kept() {
        let (service, _) = service_with("A\nB\nC\n", "carol\n").await;

        let first = service.draw("carol").await.unwrap();
        let err = service.draw("carol").await.unwrap_err();
        assert!(matches!(err, DrawError::AlreadyDrawn { .. }));

        let results = service.results().await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results.get("carol"), Some(first.as_str()));
    }

    #[tokio::test]
    async fn test_draw_trims_name() {
        let (service, _) = service_with("A\n", "").await;

        service.draw("  alice  ").await.unwrap();
        assert!(service.results().await.unwrap().contains("alice"));
        assert!(matches!(
            service.draw("alice").await,
            Err(DrawError::AlreadyDrawn { .. })
        ));
        assert!(matches!(service.draw("   ").await, Err(DrawError::MissingName)));
    }

    #[tokio::test]
    async fn test_draw_without_task_file() {
        let storage = MockStorage::new();
        let service = DrawService::new(storage, &DrawConfig::default());

        let err = service.draw("bob").await.unwrap_err();
        assert!(matches!(err, DrawError::NoTasksConfigured));
    }

    #[tokio::test]
    async fn test_draw_persists_results() {
        let (service, storage) = service_with("扫地\n", "").await;

        service.draw("李雷").await.unwrap();

        let raw = String::from_utf8(storage.get_file("results.json").await.unwrap()).unwrap();
        assert!(raw.contains("\"李雷\": \"扫地\""));
    }

    #[tokio::test]
    async fn test_results_keep_draw_order() {
        let (service, storage) = service_with("A\nB\n", "").await;

        service.draw("zed").await.unwrap();
        service.draw("amy").await.unwrap();

        let results = service.results().await.unwrap();
        let names: Vec<&str> = results.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["zed", "amy"]);

        let raw = String::from_utf8(storage.get_file("results.json").await.unwrap()).unwrap();
        assert!(raw.find("\"zed\"").unwrap() < raw.find("\"amy\"").unwrap());
    }

    #[tokio::test]
    async fn test_remaining_participants() {
        let (service, _) = service_with("A\nB\n", "alice\nbob\ncarol\n").await;

        let before = service.remaining_participants().await.unwrap();
        assert_eq!(before, vec!["alice", "bob", "carol"]);
        assert_eq!(service.remaining_participants().await.unwrap(), before);

        service.draw("bob").await.unwrap();
        assert_eq!(
            service.remaining_participants().await.unwrap(),
            vec!["alice", "carol"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_draws_are_all_persisted() {
        let pool = (0..20).map(|i| format!("task-{}", i)).collect::<Vec<_>>().join("\n");
        let (service, _) = service_with(&pool, "").await;
        let service = Arc::new(service);

        let handles: Vec<_> = (0..20)
            .map(|i| {
                let service = service.clone();
                tokio::spawn(async move { service.draw(&format!("p{}", i)).await })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let results = service.results().await.unwrap();
        assert_eq!(results.len(), 20);
        for (_, count) in results.used_counts() {
            assert_eq!(count, 1);
        }
    }

    #[tokio::test]
    async fn test_assignments_never_exceed_slot_count() {
        let (service, _) = service_with("A\nA\nB\nC\nC\nC\n", "").await;

        for i in 0..10 {
            let _ = service.draw(&format!("p{}", i)).await;
        }

        let results = service.results().await.unwrap();
        let used = results.used_counts();
        assert_eq!(results.len(), 6);
        assert!(used.get("A").copied().unwrap_or(0) <= 2);
        assert!(used.get("B").copied().unwrap_or(0) <= 1);
        assert!(used.get("C").copied().unwrap_or(0) <= 3);
    }
}
