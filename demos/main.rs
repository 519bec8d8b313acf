use megahal::{Config, Model, ReplyBudget};

const CORPUS: &str = "\
The cat sat on the mat and looked out the window.
Dogs are wonderful pets and very good friends.
Birds can fly very high in the sky above the trees.
Fish swim in the ocean and in rivers every day.
The weather is nice today and the sun is warm.
I like to read books about animals and nature.
The sun rises in the east and sets in the west.
My favorite animal is the cat because it is quiet.
The dog ran across the field chasing the ball.
";

fn main() {
    env_logger::init();

    let example_num: usize = 0;

    match example_num {
        0 => {
            let mut model = Model::new(Config { seed: Some(42), ..Config::default() });
            let report = model.learn(CORPUS);

            println!("==Training report==");
            println!("lines processed: {}", report.lines_processed);
            println!("lines learned:   {}", report.lines_learned);
            println!("tokens learned:  {}", report.tokens_learned);
            println!("vocabulary size: {}", model.symbols().len());

            println!("==Replies==");
            for line in ["Tell me about cats", "What do you think of the weather?", "Hello"] {
                let reply = model.reply(line, ReplyBudget::Iterations(200));
                println!("> {line}\n{reply}");
            }
        }
        1 => {
            let mut model = Model::new(Config::default());
            let turns = ["Hello there!", "Tell me about dogs.", "What about the sky?"];

            for turn in turns {
                let reply = model.converse(turn);
                println!("you: {turn}\nbot: {reply}");
            }
        }
        _ => {}
    }
}
