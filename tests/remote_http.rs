use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use hangman_eval::prelude::*;
use hangman_eval::remote::{HttpJudge, JudgeTransport};

/// Judge answering each connection with the next canned response.
///
/// Serves exactly as many requests as it has responses, then hands back what it received.
struct CannedJudge {
    base_url: String,
    handle: JoinHandle<Vec<String>>,
}

impl CannedJudge {
    fn spawn(responses: Vec<(u16, &'static str)>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let base_url = format!("http://{}", listener.local_addr().unwrap());
        let handle = thread::spawn(move || {
            let mut requests = Vec::new();
            for (code, body) in responses {
                let (mut stream, _) = listener.accept().unwrap();
                requests.push(read_request(&stream));
                let response = format!(
                    "HTTP/1.1 {code} Canned\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                stream.write_all(response.as_bytes()).unwrap();
                stream.flush().unwrap();
            }
            requests
        });
        CannedJudge { base_url, handle }
    }

    fn requests(self) -> Vec<String> {
        self.handle.join().unwrap()
    }
}

fn read_request(stream: &TcpStream) -> String {
    let mut reader = BufReader::new(stream);
    let mut head = String::new();
    let mut content_length = 0;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        reader.read_line(&mut line).unwrap();
        let lower = line.to_ascii_lowercase();
        if let Some(value) = lower.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap();
        }
        if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
            chunked = true;
        }
        head.push_str(&line);
        if line == "\r\n" || line.is_empty() {
            break;
        }
    }

    let mut body = Vec::new();
    if chunked {
        loop {
            let mut size = String::new();
            reader.read_line(&mut size).unwrap();
            let size = usize::from_str_radix(size.trim(), 16).unwrap();
            let mut chunk = vec![0; size + 2];
            reader.read_exact(&mut chunk).unwrap();
            if size == 0 {
                break;
            }
            body.extend_from_slice(&chunk[..size]);
        }
    } else {
        body.resize(content_length, 0);
        reader.read_exact(&mut body).unwrap();
    }
    head + &String::from_utf8_lossy(&body)
}

fn package() -> AgentPackage {
    AgentPackage::new("agent.py", "def guess(masked, wrong):\n    return 'e'\n")
}

fn metadata() -> SubmissionMetadata {
    SubmissionMetadata::new("alice", "frequency_bot")
}

const COMPLETED: &str = r#"{
    "job_id": "j1",
    "status": "completed",
    "user_id": "alice",
    "model_name": "frequency_bot",
    "results": {
        "performance": {
            "games_played": 4, "wins": 3, "losses": 1,
            "win_rate": 75.0, "avg_guesses": 8.5, "total_guesses": 34
        },
        "overall_score": 80.0,
        "length_performance": {"5": {"wins": 1, "total": 1, "win_rate": 100.0}},
        "word_results": [{"word": "apple", "won": true, "guesses": 7, "lives_left": 4}]
    }
}"#;

#[test]
fn submission_is_a_multipart_form() {
    let judge = CannedJudge::spawn(vec![(
        200,
        r#"{"job_id": "abc", "status": "queued", "message": "ok", "estimated_time": "2 minutes", "test_words": 250}"#,
    )]);
    let client = RemoteClient::connect(&judge.base_url, PollConfig::new()).unwrap();

    let receipt = client.submit(&package(), &metadata()).unwrap();
    assert_eq!(receipt.job_id, "abc");
    assert_eq!(receipt.status.as_deref(), Some("queued"));

    let requests = judge.requests();
    let request = &requests[0];
    assert!(request.starts_with("POST /api/evaluate "));
    assert!(request.contains("name=\"files\""));
    assert!(request.contains("filename=\"agent.py\""));
    assert!(request.contains("name=\"user_id\""));
    assert!(request.contains("alice"));
    assert!(request.contains("frequency_bot"));
    assert!(request.contains("return 'e'"));
}

#[test]
fn rejected_submission_keeps_status_and_body() {
    let judge = CannedJudge::spawn(vec![(500, "boom")]);
    let client = RemoteClient::connect(&judge.base_url, PollConfig::new()).unwrap();

    let err = client.submit(&package(), &metadata()).unwrap_err();
    assert_eq!(
        err,
        SubmissionError::Rejected {
            status: 500,
            body: "boom".to_owned()
        }
    );
    assert_eq!(judge.requests().len(), 1);
}

#[test]
fn submit_then_poll_until_completed() {
    let judge = CannedJudge::spawn(vec![
        (200, r#"{"job_id": "j1", "status": "queued"}"#),
        (200, r#"{"job_id": "j1", "status": "queued"}"#),
        (200, COMPLETED),
    ]);
    let config = PollConfig::new().with_poll_interval(Duration::from_millis(100));
    let client = RemoteClient::connect(&format!("{}/", judge.base_url), config).unwrap();
    assert_eq!(client.transport().base_url(), judge.base_url);

    let outcome = client
        .submit_and_wait(&package(), &metadata(), &mut ())
        .unwrap();
    let AwaitOutcome::Finished(job) = outcome else {
        panic!("unexpected outcome: {outcome:?}");
    };
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.user_id.as_deref(), Some("alice"));

    let stats = job.stats().unwrap();
    assert_eq!(stats.total_tests, 4);
    assert_eq!(stats.win_rate, 75.0);
    assert_eq!(stats.by_length[&5].wins, 1);
    assert!(render_job_report(&job).contains("Overall Score: 80/100"));

    let requests = judge.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests[1].starts_with("GET /api/status/j1 "));
    assert!(requests[2].starts_with("GET /api/status/j1 "));
}

#[test]
fn status_errors_are_classified() {
    let judge = CannedJudge::spawn(vec![(404, r#"{"detail": "not found"}"#), (200, "not json")]);
    let transport = HttpJudge::new(&judge.base_url, &PollConfig::new()).unwrap();

    assert_eq!(
        transport.fetch_status("nope"),
        Err(PollError::Http { status: 404 })
    );
    assert!(matches!(
        transport.fetch_status("nope"),
        Err(PollError::Decode(_))
    ));
    assert_eq!(judge.requests().len(), 2);
}

#[test]
fn unreachable_judge_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let transport = HttpJudge::new(&base_url, &PollConfig::new()).unwrap();
    assert!(matches!(
        transport.submit(&package(), &metadata()),
        Err(SubmissionError::Network(_))
    ));
    assert!(matches!(
        transport.fetch_status("j1"),
        Err(PollError::Network(_))
    ));
}
