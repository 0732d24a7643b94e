use crate::config::{AppConfig, DisplayConfig};
use crate::corpus::Corpus;
use crate::matcher::Matcher;
use crate::phonemes::analyze;
use crate::playback::{Playback, PlaybackOutcome, PlaybackPlan};
use crate::record::Record;
use crate::stats::stats;
use std::io::{self, BufRead, Write};

/// 交互指令
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// 空行，忽略
    Empty,
    Quit,
    Stats,
    Search(String),
    Play(String),
    Analyze(String),
    List(String),
    /// 其余输入：查找最接近的样本
    Match(String),
}

impl Command {
    /// 解析一行输入；指令词不区分大小写，参数保留原样
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        if input.is_empty() {
            return Command::Empty;
        }
        if input.eq_ignore_ascii_case("quit") {
            return Command::Quit;
        }
        if input.eq_ignore_ascii_case("stats") {
            return Command::Stats;
        }
        if let Some(query) = strip_verb(input, "search ") {
            return Command::Search(query.to_string());
        }
        if let Some(id) = strip_verb(input, "play ") {
            return Command::Play(id.trim().to_string());
        }
        if let Some(id) = strip_verb(input, "analyze ") {
            return Command::Analyze(id.trim().to_string());
        }
        if let Some(category) = strip_verb(input, "list ") {
            return Command::List(category.trim().to_string());
        }
        Command::Match(input.to_string())
    }
}

fn strip_verb<'s>(input: &'s str, verb: &str) -> Option<&'s str> {
    let head = input.get(..verb.len())?;
    head.eq_ignore_ascii_case(verb).then(|| &input[verb.len()..])
}

/// 是否继续交互
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// 一次交互会话：把指令映射到语料操作并格式化输出
pub struct Session<'a, P: Playback> {
    corpus: &'a Corpus,
    matcher: Matcher<'a>,
    display: DisplayConfig,
    player: P,
}

impl<'a, P: Playback> Session<'a, P> {
    pub fn new(corpus: &'a Corpus, config: &AppConfig, player: P) -> Self {
        Self {
            corpus,
            matcher: Matcher::new(corpus, config.matching),
            display: config.display,
            player,
        }
    }

    /// 交互循环，直到 quit 或输入结束
    pub fn run<R: BufRead, W: Write>(&self, mut input: R, out: &mut W) -> io::Result<()> {
        write_help(out)?;
        let mut line = String::new();
        loop {
            write!(out, "\n{}\n\n> ", "-".repeat(60))?;
            out.flush()?;
            line.clear();
            if input.read_line(&mut line)? == 0 {
                break;
            }
            if self.execute(Command::parse(&line), &mut input, out)? == Flow::Quit {
                writeln!(out, "再见！")?;
                break;
            }
        }
        Ok(())
    }

    /// 执行一条指令；自由文本匹配会从 `input` 读取是否播放的确认
    pub fn execute<R: BufRead, W: Write>(
        &self,
        command: Command,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<Flow> {
        match command {
            Command::Empty => {}
            Command::Quit => return Ok(Flow::Quit),
            Command::Stats => self.show_stats(out)?,
            Command::Search(query) => {
                let results = self.matcher.search(&query);
                writeln!(out, "\n找到 {} 条匹配:", results.len())?;
                self.write_records(out, &results, self.display.search_limit)?;
            }
            Command::Play(id) => self.play(&id, out)?,
            Command::Analyze(id) => self.show_analysis(&id, out)?,
            Command::List(category) => {
                let records = self.matcher.filter_by_category(&category);
                writeln!(out, "\n分类 '{category}' 下有 {} 条样本:", records.len())?;
                self.write_records(out, &records, self.display.list_limit)?;
            }
            Command::Match(text) => self.match_and_offer(&text, input, out)?,
        }
        Ok(Flow::Continue)
    }

    fn write_records<W: Write>(&self, out: &mut W, records: &[&Record], limit: usize) -> io::Result<()> {
        for r in records.iter().take(limit) {
            writeln!(out, "  {}: {}", r.id, r.text)?;
        }
        Ok(())
    }

    fn show_stats<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match stats(self.corpus) {
            Ok(s) => {
                writeln!(out, "\n样本总数: {}", s.total_samples)?;
                writeln!(out, "分类: {}", s.categories.join(", "))?;
                writeln!(out, "平均时长: {:.2}s", s.avg_duration)?;
            }
            Err(e) => writeln!(out, "\n{e}")?,
        }
        Ok(())
    }

    fn show_analysis<W: Write>(&self, id: &str, out: &mut W) -> io::Result<()> {
        let Some(analysis) = analyze(self.corpus, id) else {
            return writeln!(out, "\n未找到样本: {id}");
        };
        let preview: Vec<&str> = analysis
            .phonemes
            .iter()
            .take(self.display.phoneme_preview)
            .map(String::as_str)
            .collect();
        writeln!(out, "\n文本: {}", analysis.text)?;
        writeln!(out, "音素数: {}", analysis.phoneme_count)?;
        writeln!(out, "音素: {}...", preview.join(" "))?;
        writeln!(out, "完整序列: {}", analysis.raw_sequence)?;
        Ok(())
    }

    fn play<W: Write>(&self, id: &str, out: &mut W) -> io::Result<()> {
        let Some(record) = self.matcher.find_by_id(id) else {
            return writeln!(out, "未找到样本: {id}");
        };
        let plan = self.player.plan(record);
        match &plan {
            PlaybackPlan::Asset(_) => {
                writeln!(out, "播放: {}", record.text)?;
                writeln!(out, "音素: {}", record.phoneme_sequence)?;
                writeln!(out, "时长: {}s", record.duration_seconds)?;
            }
            PlaybackPlan::Synthesize(text) => {
                writeln!(out, "未找到音频文件，使用语音合成: {text}")?;
            }
        }
        match self.player.play(&plan) {
            Ok(PlaybackOutcome::Unavailable) => {
                writeln!(out, "语音合成不可用，文本: {}", record.text)?;
            }
            Ok(_) => {}
            Err(e) => {
                log::error!("播放 {id} 失败: {e}");
                writeln!(out, "播放失败: {e}")?;
            }
        }
        Ok(())
    }

    fn match_and_offer<R: BufRead, W: Write>(
        &self,
        text: &str,
        input: &mut R,
        out: &mut W,
    ) -> io::Result<()> {
        let record = match self.matcher.best_match(text) {
            Ok(Some(record)) => record,
            Ok(None) => return writeln!(out, "\n未找到相近的样本，请换个说法。"),
            Err(e) => return writeln!(out, "\n{e}"),
        };
        writeln!(out, "\n最接近的样本: {}", record.id)?;
        writeln!(out, "文本: {}", record.text)?;
        writeln!(out, "分类: {}", record.category)?;
        writeln!(out, "时长: {}s", record.duration_seconds)?;

        write!(out, "\n播放该样本？(y/n): ")?;
        out.flush()?;
        let mut answer = String::new();
        input.read_line(&mut answer)?;
        if answer.trim().eq_ignore_ascii_case("y") {
            self.play(&record.id, out)?;
        }
        Ok(())
    }
}

/// 指令说明
pub fn write_help<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "\n{0}\n交互模式\n{0}", "=".repeat(60))?;
    writeln!(out, "\n指令:")?;
    writeln!(out, "  1. 直接输入文本，查找并播放最接近的样本")?;
    writeln!(out, "  2. 'search <文本>' - 搜索包含该文本的样本")?;
    writeln!(out, "  3. 'play <id>' - 播放指定样本")?;
    writeln!(out, "  4. 'analyze <id>' - 查看样本音素")?;
    writeln!(out, "  5. 'list <分类>' - 列出分类下的样本")?;
    writeln!(out, "  6. 'stats' - 显示统计")?;
    writeln!(out, "  7. 'quit' - 退出")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PlaybackError;
    use std::cell::RefCell;
    use std::io::Cursor;

    #[derive(Default)]
    struct RecordingPlayer {
        played: RefCell<Vec<PlaybackPlan>>,
    }

    impl Playback for &RecordingPlayer {
        fn plan(&self, record: &Record) -> PlaybackPlan {
            PlaybackPlan::Synthesize(record.text.clone())
        }

        fn play(&self, plan: &PlaybackPlan) -> Result<PlaybackOutcome, PlaybackError> {
            self.played.borrow_mut().push(plan.clone());
            Ok(PlaybackOutcome::Synthesized {
                engine: "fake".to_string(),
            })
        }
    }

    fn record(id: &str, text: &str, category: &str) -> Record {
        Record {
            id: id.to_string(),
            text: text.to_string(),
            category: category.to_string(),
            duration_seconds: 1.25,
            phoneme_sequence: "g # uh # d # m # ao # r # n # ih # ng # eh # v # r # iy".to_string(),
            transcription: String::new(),
        }
    }

    fn corpus() -> Corpus {
        Corpus::from_records(vec![
            record("u1", "good morning everyone", "greeting"),
            record("u2", "good night everyone", "greeting"),
            record("w1", "will it rain tomorrow", "weather"),
        ])
        .unwrap()
    }

    fn transcript(corpus: &Corpus, player: &RecordingPlayer, input: &str) -> String {
        let session = Session::new(corpus, &AppConfig::default(), player);
        let mut out = Vec::new();
        session.run(Cursor::new(input.to_string()), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn parses_verbs_case_insensitively() {
        assert_eq!(Command::parse("   "), Command::Empty);
        assert_eq!(Command::parse("QUIT"), Command::Quit);
        assert_eq!(Command::parse(" Stats "), Command::Stats);
        assert_eq!(Command::parse("Search Good Mor"), Command::Search("Good Mor".to_string()));
        assert_eq!(Command::parse("play  u1 "), Command::Play("u1".to_string()));
        assert_eq!(Command::parse("ANALYZE u1"), Command::Analyze("u1".to_string()));
        assert_eq!(Command::parse("list Greetings"), Command::List("Greetings".to_string()));
        assert_eq!(Command::parse("search"), Command::Match("search".to_string()));
        assert_eq!(Command::parse("good morning"), Command::Match("good morning".to_string()));
        assert_eq!(Command::parse("plé"), Command::Match("plé".to_string()));
    }

    #[test]
    fn match_offers_playback_and_plays_on_yes() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(&corpus, &player, "good morning\ny\nquit\n");
        assert!(out.contains("最接近的样本: u1"));
        assert!(out.contains("分类: greeting"));
        assert!(out.contains("再见！"));
        assert_eq!(
            *player.played.borrow(),
            [PlaybackPlan::Synthesize("good morning everyone".to_string())]
        );
    }

    #[test]
    fn match_declined_does_not_play() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(&corpus, &player, "good morning\nn\n");
        assert!(out.contains("最接近的样本: u1"));
        assert!(player.played.borrow().is_empty());
    }

    #[test]
    fn unmatched_text_prints_hint() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(&corpus, &player, "xq\nquit\n");
        assert!(out.contains("未找到相近的样本"));
    }

    #[test]
    fn search_list_and_stats_output() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(
            &corpus,
            &player,
            "search EVERYONE\nlist greeting\nlist Greeting\nstats\nquit\n",
        );
        assert!(out.contains("找到 2 条匹配:"));
        assert!(out.contains("  u2: good night everyone"));
        assert!(out.contains("分类 'greeting' 下有 2 条样本:"));
        assert!(out.contains("分类 'Greeting' 下有 0 条样本:"));
        assert!(out.contains("样本总数: 3"));
        assert!(out.contains("分类: greeting, weather"));
    }

    #[test]
    fn analyze_previews_phonemes() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(&corpus, &player, "analyze u1\nanalyze nope\n");
        assert!(out.contains("音素数: 13"));
        assert!(out.contains("音素: g uh d m ao r n ih ng eh..."));
        assert!(out.contains("未找到样本: nope"));
    }

    #[test]
    fn play_unknown_id_reports_not_found() {
        let corpus = corpus();
        let player = RecordingPlayer::default();
        let out = transcript(&corpus, &player, "play nope\nplay w1\n");
        assert!(out.contains("未找到样本: nope"));
        assert!(out.contains("使用语音合成: will it rain tomorrow"));
        assert_eq!(
            *player.played.borrow(),
            [PlaybackPlan::Synthesize("will it rain tomorrow".to_string())]
        );
    }
}
