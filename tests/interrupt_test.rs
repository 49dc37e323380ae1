//! 进程级测试：stdin 保持打开时，Ctrl-C（SIGINT）也能让进程退出

#[cfg(unix)]
mod tests {
    use std::io::Read;
    use std::process::{Command, Stdio};
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    const PROMPT: &str = "let start chatting:";

    #[test]
    fn test_sigint_exits_while_waiting_for_input() {
        let mut child = Command::new(env!("CARGO_BIN_EXE_sage"))
            .env("SAGE__LLM__PROVIDER", "mock")
            .env("SAGE__APP__CHANNEL", "text")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .expect("spawn sage");

        // 等到提示符出现：此时主循环已在读 stdin，Ctrl-C 处理器也已注册
        let mut stdout = child.stdout.take().expect("stdout piped");
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut seen = Vec::new();
            let mut buf = [0u8; 64];
            while let Ok(n) = stdout.read(&mut buf) {
                if n == 0 {
                    break;
                }
                seen.extend_from_slice(&buf[..n]);
                if String::from_utf8_lossy(&seen).contains(PROMPT) {
                    let _ = tx.send(());
                }
            }
        });
        if rx.recv_timeout(Duration::from_secs(30)).is_err() {
            let _ = child.kill();
            panic!("prompt never appeared");
        }
        thread::sleep(Duration::from_millis(200));

        let status = Command::new("kill")
            .args(["-INT", &child.id().to_string()])
            .status()
            .expect("run kill");
        assert!(status.success());

        // stdin 仍由本进程持有（未关闭），进程必须自行退出
        let _stdin_kept_open = &child.stdin;
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            if let Some(status) = child.try_wait().expect("try_wait") {
                assert!(status.success(), "unexpected exit status {status:?}");
                break;
            }
            if Instant::now() > deadline {
                let _ = child.kill();
                panic!("sage still running 5s after SIGINT");
            }
            thread::sleep(Duration::from_millis(50));
        }
    }
}
