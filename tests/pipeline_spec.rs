use std::fs;
use std::sync::Mutex;

use async_trait::async_trait;
use ghostwriter::llm::Completer;
use ghostwriter::models::*;
use ghostwriter::pipeline::*;
use ghostwriter::prompts::PromptBuilder;
use ghostwriter::store::{Artifact, ProjectStore};
use speculate2::speculate;
use tokio_test::block_on;

/// Completer that answers from a closure and records every prompt it saw.
struct StubCompleter {
    respond: Box<dyn Fn(&str) -> Option<String> + Send + Sync>,
    prompts: Mutex<Vec<String>>,
}

impl StubCompleter {
    fn new(respond: impl Fn(&str) -> Option<String> + Send + Sync + 'static) -> Self {
        Self {
            respond: Box::new(respond),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn always(text: &str) -> Self {
        let text = text.to_string();
        Self::new(move |_| Some(text.clone()))
    }

    fn failing() -> Self {
        Self::new(|_| None)
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl Completer for StubCompleter {
    async fn complete(&self, prompt: &str, _max_retries: u32) -> Option<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        (self.respond)(prompt)
    }
}

const OUTLINE: &str = "- Josh met DJ\n- They fell in love";
const QUESTIONS: &str = r#"["What did the room smell like?"]"#;

fn pipeline(store: &ProjectStore, completer: StubCompleter) -> Pipeline<StubCompleter> {
    let prompts = PromptBuilder::new(AuthorContext::default()).expect("templates should register");
    Pipeline::new(store.clone(), completer, prompts)
}

fn answered(point: &str) -> InterviewRecord {
    InterviewRecord {
        outline_point: point.to_string(),
        q_and_a: vec![QaPair::new("What did the room smell like?", "It smelled like rain")],
    }
}

speculate! {
    before {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let store = ProjectStore::new(dir.path().join("project"));
    }

    describe "outline phase" {
        it "saves the completion as the outline" {
            fs::create_dir_all(store.root()).unwrap();
            fs::write(store.path(Artifact::RawText), "Josh met DJ in 2019.").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(OUTLINE));

            let report = block_on(pipeline.outline()).expect("Outline phase failed");

            assert_eq!(report.points, 2);
            assert_eq!(report.path, store.path(Artifact::Outline));
            assert_eq!(store.load_outline().unwrap(), OUTLINE);
            let prompts = pipeline.completer().prompts.lock().unwrap();
            assert!(prompts[0].contains("Josh met DJ in 2019."));
        }

        it "passes template syntax in the raw text through untouched" {
            fs::create_dir_all(store.root()).unwrap();
            fs::write(store.path(Artifact::RawText), "Dad wrote {{ author_name }} on the wall.").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(OUTLINE));

            block_on(pipeline.outline()).expect("Outline phase failed");

            let prompts = pipeline.completer().prompts.lock().unwrap();
            assert!(prompts[0].contains("Dad wrote {{ author_name }} on the wall."));
        }

        it "aborts without calling the model when raw text is missing" {
            let pipeline = pipeline(&store, StubCompleter::always(OUTLINE));

            let err = block_on(pipeline.outline()).expect_err("Expected abort");

            assert!(matches!(
                err,
                PhaseError::PreconditionMissing { artifact: Artifact::RawText, .. }
            ));
            assert_eq!(pipeline.completer().calls(), 0);
        }

        it "writes nothing when the model fails" {
            fs::create_dir_all(store.root()).unwrap();
            fs::write(store.path(Artifact::RawText), "text").unwrap();
            let pipeline = pipeline(&store, StubCompleter::failing());

            let err = block_on(pipeline.outline()).expect_err("Expected failure");

            assert!(matches!(err, PhaseError::CompletionFailed));
            assert!(!store.path(Artifact::Outline).exists());
        }
    }

    describe "interview phase" {
        it "records one entry per outline point" {
            store.save_outline(OUTLINE).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));
            let mut answers = ScriptedAnswers::new([
                "It smelled like rain", "done",
                "It smelled like rain", "done",
            ]);

            let report = block_on(pipeline.interview(&mut answers)).expect("Interview failed");

            assert_eq!(report, InterviewReport { interviewed: 2, skipped: 0, failed: 0 });
            assert_eq!(
                store.load_interview_records().unwrap(),
                vec![answered("- Josh met DJ"), answered("- They fell in love")]
            );
            assert_eq!(answers.asked()[0], "What did the room smell like?");
            assert_eq!(answers.asked()[1], MORE_PROMPT);
        }

        it "stores extra input under the tell-me-more label" {
            store.save_outline("- Josh met DJ").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));
            let mut answers = ScriptedAnswers::new(["rain", "We danced", "Done"]);

            block_on(pipeline.interview(&mut answers)).unwrap();

            let records = store.load_interview_records().unwrap();
            assert_eq!(records[0].q_and_a.len(), 2);
            assert_eq!(records[0].q_and_a[1], QaPair::new(TELL_ME_MORE, "We danced"));
        }

        it "is idempotent once every point is recorded" {
            store.save_outline(OUTLINE).unwrap();
            let before = vec![answered("- Josh met DJ"), answered("- They fell in love")];
            store.save_interview_records(&before).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));
            let mut answers = ScriptedAnswers::default();

            let report = block_on(pipeline.interview(&mut answers)).unwrap();

            assert_eq!(report, InterviewReport { interviewed: 0, skipped: 2, failed: 0 });
            assert_eq!(pipeline.completer().calls(), 0);
            assert!(answers.asked().is_empty());
            assert_eq!(store.load_interview_records().unwrap(), before);
        }

        it "resumes with only the remaining points" {
            store.save_outline("- one\n- two\n- three").unwrap();
            let first = answered("- one");
            store.save_interview_records(&[first.clone()]).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));
            let mut answers = ScriptedAnswers::new(["a", "done", "b", "done"]);

            let report = block_on(pipeline.interview(&mut answers)).unwrap();

            assert_eq!(report.interviewed, 2);
            assert_eq!(report.skipped, 1);
            assert_eq!(pipeline.completer().calls(), 2);
            let records = store.load_interview_records().unwrap();
            assert_eq!(records.len(), 3);
            assert_eq!(records[0], first);
            assert_eq!(records[1].outline_point, "- two");
            assert_eq!(records[2].outline_point, "- three");
        }

        it "skips a point whose questions are not a JSON array" {
            store.save_outline(OUTLINE).unwrap();
            let completer = StubCompleter::new(|prompt| {
                if prompt.contains("- Josh met DJ") {
                    Some("not json".to_string())
                } else {
                    Some(QUESTIONS.to_string())
                }
            });
            let pipeline = pipeline(&store, completer);
            let mut answers = ScriptedAnswers::new(["It smelled like rain", "done"]);

            let report = block_on(pipeline.interview(&mut answers)).unwrap();

            assert_eq!(report, InterviewReport { interviewed: 1, skipped: 0, failed: 1 });
            assert_eq!(
                store.load_interview_records().unwrap(),
                vec![answered("- They fell in love")]
            );
        }

        it "skips points the model fails on" {
            store.save_outline(OUTLINE).unwrap();
            let pipeline = pipeline(&store, StubCompleter::failing());
            let mut answers = ScriptedAnswers::default();

            let report = block_on(pipeline.interview(&mut answers)).unwrap();

            assert_eq!(report.failed, 2);
            assert!(store.read_interview_records().unwrap().is_none());
        }

        it "only interviews a repeated point once" {
            store.save_outline("- same\n- same").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always("[]"));
            let mut answers = ScriptedAnswers::new(["done"]);

            let report = block_on(pipeline.interview(&mut answers)).unwrap();

            assert_eq!(report, InterviewReport { interviewed: 1, skipped: 1, failed: 0 });
            assert_eq!(store.load_interview_records().unwrap().len(), 1);
        }

        it "keeps completed points when input closes mid-interview" {
            store.save_outline(OUTLINE).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));
            let mut answers = ScriptedAnswers::new(["It smelled like rain", "done", "half"]);

            let err = block_on(pipeline.interview(&mut answers)).expect_err("Expected abort");

            assert!(matches!(err, PhaseError::Answer(AnswerError::Closed)));
            assert_eq!(
                store.load_interview_records().unwrap(),
                vec![answered("- Josh met DJ")]
            );
        }

        it "aborts when the outline is missing" {
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));

            let err = block_on(pipeline.interview(&mut ScriptedAnswers::default())).unwrap_err();

            assert!(matches!(
                err,
                PhaseError::PreconditionMissing { artifact: Artifact::Outline, .. }
            ));
        }

        it "aborts when the outline has no bullet lines" {
            store.save_outline("## Chapter one\nJust prose.").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always(QUESTIONS));

            let err = block_on(pipeline.interview(&mut ScriptedAnswers::default())).unwrap_err();

            assert!(matches!(err, PhaseError::NoOutlinePoints { .. }));
            assert_eq!(pipeline.completer().calls(), 0);
        }
    }

    describe "write phase" {
        it "appends one headed scene per record" {
            store
                .save_interview_records(&[answered("- Josh met DJ"), answered("- They fell in love")])
                .unwrap();
            let pipeline = pipeline(&store, StubCompleter::always("Scene text."));

            let report = block_on(pipeline.write()).expect("Write failed");

            assert_eq!(report, WriteReport { drafted: 2, failed: 0 });
            assert_eq!(
                store.load_draft().unwrap(),
                "## - Josh met DJ\n\nScene text.\n\n## - They fell in love\n\nScene text.\n\n"
            );
            let prompts = pipeline.completer().prompts.lock().unwrap();
            assert!(prompts[0].contains("Q: What did the room smell like?\nA: It smelled like rain"));
        }

        it "continues past records the model fails on" {
            store
                .save_interview_records(&[answered("- Josh met DJ"), answered("- They fell in love")])
                .unwrap();
            let completer = StubCompleter::new(|prompt| {
                (!prompt.contains("- Josh met DJ")).then(|| "Scene text.".to_string())
            });
            let pipeline = pipeline(&store, completer);

            let report = block_on(pipeline.write()).unwrap();

            assert_eq!(report, WriteReport { drafted: 1, failed: 1 });
            assert_eq!(
                store.load_draft().unwrap(),
                "## - They fell in love\n\nScene text.\n\n"
            );
        }

        it "duplicates scenes when re-run in append mode" {
            store.save_interview_records(&[answered("- Josh met DJ")]).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always("Scene text."));

            block_on(pipeline.write()).unwrap();
            block_on(pipeline.write()).unwrap();

            assert_eq!(store.load_draft().unwrap().matches("## - Josh met DJ").count(), 2);
        }

        it "replaces the draft in overwrite mode" {
            store.save_interview_records(&[answered("- Josh met DJ")]).unwrap();
            store.append_draft_scene("## stale\n\nOld text.").unwrap();
            let pipeline = pipeline(&store, StubCompleter::always("Scene text."))
                .with_draft_mode(DraftMode::Overwrite);

            block_on(pipeline.write()).unwrap();
            block_on(pipeline.write()).unwrap();

            assert_eq!(
                store.load_draft().unwrap(),
                "## - Josh met DJ\n\nScene text.\n\n"
            );
        }

        it "aborts when interview data is missing" {
            let pipeline = pipeline(&store, StubCompleter::always("Scene text."));

            let err = block_on(pipeline.write()).unwrap_err();

            assert!(matches!(
                err,
                PhaseError::PreconditionMissing { artifact: Artifact::InterviewData, .. }
            ));
            assert!(!store.path(Artifact::Draft).exists());
        }

        it "aborts when interview data is empty" {
            store.save_interview_records(&[]).unwrap();
            let pipeline = pipeline(&store, StubCompleter::always("Scene text."))
                .with_draft_mode(DraftMode::Overwrite);

            let err = block_on(pipeline.write()).unwrap_err();

            assert!(matches!(err, PhaseError::NoInterviewRecords { .. }));
            assert!(!store.path(Artifact::Draft).exists());
        }
    }

    describe "end to end" {
        it "runs all three phases and reports progress" {
            fs::create_dir_all(store.root()).unwrap();
            fs::write(store.path(Artifact::RawText), "Josh met DJ in 2019.").unwrap();

            block_on(pipeline(&store, StubCompleter::always(OUTLINE)).outline()).unwrap();

            let status = ProjectStatus::collect(&store).unwrap();
            assert_eq!(status.outline_points, Some(2));
            assert_eq!(status.remaining, vec!["- Josh met DJ", "- They fell in love"]);

            let mut answers = ScriptedAnswers::new([
                "It smelled like rain", "done",
                "It smelled like rain", "done",
            ]);
            block_on(pipeline(&store, StubCompleter::always(QUESTIONS)).interview(&mut answers))
                .unwrap();
            block_on(pipeline(&store, StubCompleter::always("Scene text.")).write()).unwrap();

            let records = store.load_interview_records().unwrap();
            assert_eq!(records.len(), 2);
            assert!(records.iter().all(|r| r.q_and_a.len() == 1));

            let draft = store.load_draft().unwrap();
            assert_eq!(draft.matches("Scene text.").count(), 2);

            let status = ProjectStatus::collect(&store).unwrap();
            assert!(status.has_raw_text);
            assert_eq!(status.interviewed, 2);
            assert!(status.remaining.is_empty());
            assert_eq!(status.drafted, 2);
        }
    }
}
